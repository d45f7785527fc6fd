//! Functional-interface fallback.
//!
//! Compilers lower closures to generated classes that implement one
//! interface and carry a synthetic implementation of its single abstract
//! method. Direct lookup never matches synthetic members, so calling the
//! interface method by name on such an object finds nothing. This resolver
//! binds the call to the interface-declared signature instead and dispatches
//! to the generated implementation.
//!
//! It runs last. Its trigger is checked deterministically: the runtime class
//! implements exactly one interface, that interface requires exactly one
//! abstract method, and the requested name matches it. Anything else yields
//! no candidates.

use lumen_types::{ClassRef, MethodDef, Modifiers, TypeRegistry};
use rustc_hash::FxHashSet;

use super::{LookupRequest, MemberResolver};
use crate::candidate::{arity_matches, CandidateMember, MemberBinding, MemberKind};

/// Which interfaces qualify for the fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FunctionalFallback {
    /// Never bind through an interface.
    Disabled,
    /// Any interface with a single abstract method.
    #[default]
    AnySingleAbstractMethod,
    /// Only interfaces carrying `Modifiers::FUNCTIONAL`.
    MarkedOnly,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FunctionalResolver {
    policy: FunctionalFallback,
}

impl FunctionalResolver {
    pub fn new(policy: FunctionalFallback) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FunctionalFallback {
        self.policy
    }

    /// The single interface declared on the class or its superclasses.
    fn sole_interface(types: &TypeRegistry, class: &ClassRef) -> Option<ClassRef> {
        let mut declared = FxHashSet::default();
        for owner in types.superclass_chain(class) {
            declared.extend(owner.interfaces().iter().copied());
        }
        if declared.len() != 1 {
            return None;
        }
        let name = declared.into_iter().next()?;
        types.lookup(name)
    }
}

impl MemberResolver for FunctionalResolver {
    fn resolve(&self, request: &LookupRequest<'_>, types: &TypeRegistry) -> Vec<CandidateMember> {
        if self.policy == FunctionalFallback::Disabled || request.kind != MemberKind::Method {
            return Vec::new();
        }
        let Some(iface) = Self::sole_interface(types, request.class) else {
            return Vec::new();
        };
        if self.policy == FunctionalFallback::MarkedOnly
            && !iface.modifiers().contains(Modifiers::FUNCTIONAL)
        {
            return Vec::new();
        }

        let required = types.abstract_methods(&iface);
        let [(declaring, index)] = required.as_slice() else {
            return Vec::new();
        };
        let Some(sam) = declaring.method(*index) else {
            return Vec::new();
        };
        if sam.name != request.name || !arity_matches(sam.params.len(), sam.is_varargs(), request.argc()) {
            return Vec::new();
        }
        let Some((implementor, impl_index)) = implementation(types, request.class, sam) else {
            return Vec::new();
        };

        let interner = types.interner();
        tracing::debug!(
            class = interner.lookup(request.class.name()),
            interface = interner.lookup(iface.name()),
            method = interner.lookup(sam.name),
            "bound through functional interface"
        );
        vec![CandidateMember {
            kind: MemberKind::Method,
            declaring: ClassRef::clone(declaring),
            params: sam.params.clone(),
            varargs: sam.is_varargs(),
            accessible: true,
            binding: MemberBinding::Virtual {
                implementor,
                index: impl_index,
            },
        }]
    }

    fn name(&self) -> &'static str {
        "FunctionalResolver"
    }
}

/// The method implementing `sam` on `class` or a superclass, generated
/// members included. An exact signature wins over a same-named method of the
/// same arity.
fn implementation(types: &TypeRegistry, class: &ClassRef, sam: &MethodDef) -> Option<(ClassRef, usize)> {
    let chain = types.superclass_chain(class);
    let find = |matches: &dyn Fn(&MethodDef) -> bool| {
        chain.iter().find_map(|owner| {
            owner
                .methods()
                .iter()
                .position(|m| m.body.is_some() && matches(m))
                .map(|index| (ClassRef::clone(owner), index))
        })
    };
    find(&|m: &MethodDef| m.same_signature(sam))
        .or_else(|| find(&|m: &MethodDef| m.name == sam.name && m.params.len() == sam.params.len()))
}
