//! Direct reflective lookup of methods, properties and constructors.

use lumen_ir::Name;
use lumen_types::{ClassRef, MethodDef, Modifiers, Primitive, TypeRegistry, TypeShape};

use super::{LookupRequest, MemberResolver};
use crate::candidate::{arity_matches, CandidateMember, MemberBinding, MemberKind};

/// Resolver for members declared on the target's runtime class.
///
/// Walks the class and its superclass chain, then the default methods of the
/// interfaces it implements. Synthetic and bridge members are never matched
/// here.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectResolver;

impl MemberResolver for DirectResolver {
    fn resolve(&self, request: &LookupRequest<'_>, types: &TypeRegistry) -> Vec<CandidateMember> {
        match request.kind {
            MemberKind::Method => {
                collect_methods(types, request.class, request.name, request.argc(), MemberKind::Method)
            }
            MemberKind::Property if request.argc() == 0 => property(types, request.class, request.name),
            MemberKind::Constructor => constructors(request.class, request.argc()),
            MemberKind::Property | MemberKind::Indexer => Vec::new(),
        }
    }

    fn name(&self) -> &'static str {
        "DirectResolver"
    }
}

/// Methods named `name` taking `argc` arguments, most derived first, with
/// overridden signatures skipped.
pub(super) fn collect_methods(
    types: &TypeRegistry,
    class: &ClassRef,
    name: Name,
    argc: usize,
    kind: MemberKind,
) -> Vec<CandidateMember> {
    let mut found: Vec<CandidateMember> = Vec::new();
    let mut seen: Vec<&MethodDef> = Vec::new();

    let chain = types.superclass_chain(class);
    let interfaces = types.all_interfaces(class);
    let declaring = chain
        .iter()
        .map(|c| (c, false))
        .chain(interfaces.iter().map(|i| (i, true)));

    for (owner, is_interface) in declaring {
        for (index, method) in owner.methods().iter().enumerate() {
            if method.name != name
                || method.modifiers.is_generated()
                || !arity_matches(method.params.len(), method.is_varargs(), argc)
            {
                continue;
            }
            // Interfaces contribute only methods with a body.
            if is_interface && method.is_abstract() {
                continue;
            }
            if seen.iter().any(|m| m.same_signature(method)) {
                continue;
            }
            seen.push(method);
            found.push(CandidateMember {
                kind,
                declaring: ClassRef::clone(owner),
                params: method.params.clone(),
                varargs: method.is_varargs(),
                accessible: method.modifiers.is_accessible(),
                binding: MemberBinding::Method(index),
            });
        }
    }
    found
}

/// Accessors `getX()` / `isX()` and fields named `x`.
fn property(types: &TypeRegistry, class: &ClassRef, name: Name) -> Vec<CandidateMember> {
    let interner = types.interner();
    let property = interner.lookup(name);
    let capitalized = capitalize(property);

    let mut found = Vec::new();
    if let Some(getter) = interner.get(&format!("get{capitalized}")) {
        found.extend(collect_methods(types, class, getter, 0, MemberKind::Property));
    }
    if let Some(is_getter) = interner.get(&format!("is{capitalized}")) {
        found.extend(
            collect_methods(types, class, is_getter, 0, MemberKind::Property)
                .into_iter()
                .filter(|c| returns_boolean(types, c)),
        );
    }

    let has_getter = found.iter().any(|c| c.accessible);
    if !has_getter {
        // The most derived declaration hides the others.
        let field = types.superclass_chain(class).into_iter().find_map(|owner| {
            let index = owner.fields().iter().position(|f| f.name == name)?;
            Some((owner, index))
        });
        if let Some((owner, index)) = field {
            let accessible = owner
                .field(index)
                .is_some_and(|f| f.modifiers.is_accessible());
            found.push(CandidateMember {
                kind: MemberKind::Property,
                declaring: owner,
                params: Vec::new(),
                varargs: false,
                accessible,
                binding: MemberBinding::Field(index),
            });
        }
    }
    found
}

fn returns_boolean(types: &TypeRegistry, candidate: &CandidateMember) -> bool {
    let MemberBinding::Method(index) = candidate.binding else {
        return false;
    };
    candidate
        .declaring
        .method(index)
        .is_some_and(|m| match &m.return_type {
            TypeShape::Primitive(Primitive::Boolean) => true,
            TypeShape::Class(n) => types.interner().lookup(*n) == "Boolean",
            _ => false,
        })
}

fn constructors(class: &ClassRef, argc: usize) -> Vec<CandidateMember> {
    if class.is_interface() || class.modifiers().contains(Modifiers::ABSTRACT) {
        return Vec::new();
    }
    class
        .constructors()
        .iter()
        .enumerate()
        .filter(|(_, ctor)| {
            !ctor.modifiers.is_generated() && arity_matches(ctor.params.len(), ctor.is_varargs(), argc)
        })
        .map(|(index, ctor)| CandidateMember {
            kind: MemberKind::Constructor,
            declaring: ClassRef::clone(class),
            params: ctor.params.clone(),
            varargs: ctor.is_varargs(),
            accessible: ctor.modifiers.is_accessible(),
            binding: MemberBinding::Constructor(index),
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
