//! Element access: `target[index]`.

use lumen_types::{ClassRef, Primitive, TypeRegistry, TypeShape, Value};

use super::direct::collect_methods;
use super::{LookupRequest, MemberResolver};
use crate::candidate::{CandidateMember, ElementAccess, MemberBinding, MemberKind};

/// Resolver for indexer nodes.
///
/// Arrays, lists and strings take an integral index; maps take a text key.
/// The argument's shape is inspected first: an index or key of the wrong
/// shape falls back to one-argument `get` methods on the runtime class.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexerResolver;

impl MemberResolver for IndexerResolver {
    fn resolve(&self, request: &LookupRequest<'_>, types: &TypeRegistry) -> Vec<CandidateMember> {
        if request.kind != MemberKind::Indexer {
            return Vec::new();
        }
        let [arg] = request.arg_shapes else {
            return Vec::new();
        };

        let string = TypeShape::Class(types.core().string);
        let element = match request.target {
            Value::Array { .. } | Value::List(_) if is_index(arg, &string) => {
                Some((ElementAccess::Sequence, TypeShape::Primitive(Primitive::Long)))
            }
            Value::Str(_) if is_index(arg, &string) => {
                Some((ElementAccess::Text, TypeShape::Primitive(Primitive::Long)))
            }
            Value::Map(_) if *arg == string => Some((ElementAccess::Map, string)),
            _ => None,
        };
        if let Some((access, param)) = element {
            return vec![element_candidate(request.class, access, param)];
        }

        match types.interner().get("get") {
            Some(get) => collect_methods(types, request.class, get, 1, MemberKind::Indexer),
            None => Vec::new(),
        }
    }

    fn name(&self) -> &'static str {
        "IndexerResolver"
    }
}

/// Integral primitives, or text that may parse to one.
fn is_index(shape: &TypeShape, string: &TypeShape) -> bool {
    matches!(
        shape,
        TypeShape::Primitive(Primitive::Int | Primitive::Long | Primitive::Char)
    ) || shape == string
}

fn element_candidate(class: &ClassRef, access: ElementAccess, param: TypeShape) -> CandidateMember {
    CandidateMember {
        kind: MemberKind::Indexer,
        declaring: ClassRef::clone(class),
        params: vec![param],
        varargs: false,
        accessible: true,
        binding: MemberBinding::Element(access),
    }
}
