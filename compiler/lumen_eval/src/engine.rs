//! Member resolution engine.
//!
//! Resolution moves through `Unresolved -> CandidatesGathered -> Scored` and
//! ends in one of the `Resolution` outcomes:
//!
//! 1. Gather: the resolver chain produces the candidates whose name and
//!    arity match.
//! 2. Score: each candidate's cost is the sum of its per-argument conversion
//!    costs (see `convert`), plus the packing cost of a variadic tail.
//! 3. Select: the unique minimum wins. A tie is `Ambiguous`; the engine never
//!    picks one of several equally good candidates.
//!
//! `Engine::invoke` is the cached path the evaluator uses: it consults the
//! node's `InvocationCache` first and resolves only on a miss.

use lumen_ir::{ExprId, Name, StringInterner};
use lumen_types::{display_params, ClassRef, SharedTypes, TypeRegistry, TypeShape, Value};

use crate::builder::EngineBuilder;
use crate::cache::{CacheKey, InvocationCache};
use crate::candidate::{CandidateMember, MemberKind};
use crate::convert::{TypeConverter, VARARGS};
use crate::errors::{
    access_denied, ambiguous, invocation_failed, not_found, null_target, unknown_type, EvalError,
    EvalResult,
};
use crate::invoker::{ConversionPlan, InvokeFailure, ResolvedInvoker};
use crate::resolvers::{Gathered, LookupRequest, ResolverRegistry};

/// A member access node: identity, what it asks for, and the member name.
///
/// For constructors `name` is the class name; for indexers it is
/// `Name::EMPTY`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberAccess {
    pub node: ExprId,
    pub kind: MemberKind,
    pub name: Name,
}

impl MemberAccess {
    pub const fn new(node: ExprId, kind: MemberKind, name: Name) -> Self {
        Self { node, kind, name }
    }

    fn display(&self, interner: &StringInterner) -> String {
        match self.kind {
            MemberKind::Method | MemberKind::Property => interner.lookup(self.name).to_owned(),
            MemberKind::Constructor => format!("new {}", interner.lookup(self.name)),
            MemberKind::Indexer => "[]".to_owned(),
        }
    }
}

/// Terminal state of one resolution.
#[derive(Debug)]
pub enum Resolution {
    Resolved(ResolvedInvoker),
    /// Several candidates share the minimum score.
    Ambiguous(Vec<CandidateMember>),
    /// Candidates matched name and arity, but none accepts the argument
    /// shapes.
    Unconvertible(Vec<CandidateMember>),
    /// Only inaccessible members matched.
    Inaccessible(Vec<CandidateMember>),
    NotFound,
}

/// The outcomes of `Resolution` that are reported as errors.
enum Unresolved {
    Ambiguous(Vec<CandidateMember>),
    Unconvertible(Vec<CandidateMember>),
    Inaccessible(Vec<CandidateMember>),
    NotFound,
}

impl Resolution {
    fn into_result(self) -> Result<ResolvedInvoker, Unresolved> {
        match self {
            Resolution::Resolved(invoker) => Ok(invoker),
            Resolution::Ambiguous(c) => Err(Unresolved::Ambiguous(c)),
            Resolution::Unconvertible(c) => Err(Unresolved::Unconvertible(c)),
            Resolution::Inaccessible(c) => Err(Unresolved::Inaccessible(c)),
            Resolution::NotFound => Err(Unresolved::NotFound),
        }
    }
}

/// The resolution engine. Immutable after construction and cheap to clone.
#[derive(Clone, Debug)]
pub struct Engine {
    types: SharedTypes,
    resolvers: ResolverRegistry,
    converter: TypeConverter,
}

impl Engine {
    pub fn builder(types: SharedTypes) -> EngineBuilder {
        EngineBuilder::new(types)
    }

    pub(crate) fn new(types: SharedTypes, resolvers: ResolverRegistry) -> Self {
        let converter = TypeConverter::new(types.clone());
        Self {
            types,
            resolvers,
            converter,
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn shared_types(&self) -> &SharedTypes {
        &self.types
    }

    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    pub fn converter(&self) -> &TypeConverter {
        &self.converter
    }

    fn interner(&self) -> &StringInterner {
        self.types.interner()
    }

    /// The class an access resolves against: the named class for
    /// constructors, otherwise the target's runtime class.
    pub fn target_class(&self, access: &MemberAccess, target: &Value) -> Result<ClassRef, EvalError> {
        let interner = self.interner();
        let class = match access.kind {
            MemberKind::Constructor => self
                .types
                .lookup(access.name)
                .ok_or_else(|| unknown_type(interner.lookup(access.name))),
            _ if target.is_null() => Err(null_target(&access.display(interner))),
            _ => self
                .types
                .runtime_class(target)
                .ok_or_else(|| unknown_type(target.kind_name())),
        };
        class.map_err(|err| err.at(access.node))
    }

    /// Gather, score and select. Pure: consults no cache.
    pub fn select(&self, request: &LookupRequest<'_>) -> Resolution {
        let (resolver, candidates) = match self.resolvers.gather(request, &self.types) {
            Gathered::Found {
                resolver,
                candidates,
            } => (resolver, candidates),
            Gathered::Inaccessible(candidates) => return Resolution::Inaccessible(candidates),
            Gathered::Empty => return Resolution::NotFound,
        };

        let interner = self.interner();
        let mut best: Vec<(CandidateMember, ConversionPlan)> = Vec::new();
        let mut best_score = u32::MAX;
        let mut rejected = Vec::new();
        for candidate in candidates {
            let Some((score, plan)) = self.score(&candidate, request.arg_shapes) else {
                tracing::trace!(resolver, candidate = %candidate.describe(interner), "rejected");
                rejected.push(candidate);
                continue;
            };
            tracing::trace!(resolver, candidate = %candidate.describe(interner), score, "scored");
            if score < best_score {
                best.clear();
                best_score = score;
            }
            if score == best_score {
                best.push((candidate, plan));
            }
        }

        if best.len() > 1 {
            return Resolution::Ambiguous(best.into_iter().map(|(c, _)| c).collect());
        }
        match best.pop() {
            Some((member, plan)) => Resolution::Resolved(ResolvedInvoker::new(
                member,
                plan,
                best_score,
                request.arg_shapes.to_vec(),
                self.converter.clone(),
            )),
            None => Resolution::Unconvertible(rejected),
        }
    }

    /// Score one candidate against argument shapes. `None` if some argument
    /// has no conversion to its parameter.
    fn score(&self, candidate: &CandidateMember, shapes: &[TypeShape]) -> Option<(u32, ConversionPlan)> {
        let params = &candidate.params;
        let cost_of = |targets: &[TypeShape], shapes: &[TypeShape]| -> Option<u32> {
            targets
                .iter()
                .zip(shapes)
                .map(|(to, from)| self.converter.classify(from, to).map(|c| c.cost))
                .sum()
        };

        let tail = match params.split_last() {
            Some((TypeShape::Array(element), fixed)) if candidate.varargs => Some((element, fixed)),
            _ => None,
        };
        let Some((element, fixed)) = tail else {
            if shapes.len() != params.len() {
                return None;
            }
            return cost_of(params, shapes).map(|cost| (cost, ConversionPlan::direct(params.clone())));
        };

        // An array passed straight to the variadic parameter.
        let direct = if shapes.len() == params.len() {
            cost_of(params, shapes).map(|cost| (cost, ConversionPlan::direct(params.clone())))
        } else {
            None
        };
        let packed = if shapes.len() >= fixed.len() {
            let (head, rest) = shapes.split_at(fixed.len());
            let head_cost = cost_of(fixed, head);
            let rest_cost: Option<u32> = rest
                .iter()
                .map(|from| self.converter.classify(from, element).map(|c| c.cost))
                .sum();
            head_cost.zip(rest_cost).map(|(h, r)| {
                (
                    h + VARARGS + r,
                    ConversionPlan::packed(fixed.to_vec(), TypeShape::clone(element)),
                )
            })
        } else {
            None
        };

        match (direct, packed) {
            (Some(d), Some(p)) => Some(if p.0 < d.0 { p } else { d }),
            (d, p) => d.or(p),
        }
    }

    /// Turn a non-resolved outcome into the error callers see.
    fn failure(&self, access: &MemberAccess, shapes: &[TypeShape], unresolved: Unresolved) -> EvalError {
        let interner = self.interner();
        let member = access.display(interner);
        match unresolved {
            Unresolved::Ambiguous(candidates) => ambiguous(
                &member,
                candidates
                    .iter()
                    .map(|c| c.describe(interner).to_string())
                    .collect(),
            ),
            Unresolved::Inaccessible(candidates) => match candidates.first() {
                Some(c) => access_denied(&c.describe(interner).to_string()),
                None => access_denied(&member),
            },
            Unresolved::Unconvertible(candidates) => match candidates.as_slice() {
                [only] => self
                    .first_unconvertible(only, shapes)
                    .unwrap_or_else(|| not_found(&member, &display_params(shapes, interner))),
                _ => not_found(&member, &display_params(shapes, interner)),
            },
            Unresolved::NotFound => not_found(&member, &display_params(shapes, interner)),
        }
    }

    /// Conversion error for the first argument `candidate` cannot take.
    fn first_unconvertible(&self, candidate: &CandidateMember, shapes: &[TypeShape]) -> Option<EvalError> {
        let params = &candidate.params;
        let last = params.len().checked_sub(1)?;
        shapes.iter().enumerate().find_map(|(i, from)| {
            let to = match &params[i.min(last)] {
                TypeShape::Array(element) if candidate.varargs && i >= last => &**element,
                other => other,
            };
            match self.converter.classify(from, to) {
                Some(_) => None,
                None => Some(self.converter.mismatch(from, to)),
            }
        })
    }

    /// Resolve without consulting a cache, against `class`.
    fn resolve_against(
        &self,
        access: &MemberAccess,
        target: &Value,
        class: &ClassRef,
        shapes: &[TypeShape],
    ) -> Result<ResolvedInvoker, EvalError> {
        let request = LookupRequest {
            kind: access.kind,
            name: access.name,
            target,
            class,
            arg_shapes: shapes,
        };
        let type_name = self.interner().lookup(class.name());
        match self.select(&request).into_result() {
            Ok(invoker) => {
                tracing::debug!(
                    node = %access.node,
                    target = type_name,
                    member = %invoker.member().describe(self.interner()),
                    score = invoker.score(),
                    "resolved member"
                );
                Ok(invoker)
            }
            Err(unresolved) => Err(self.failure(access, shapes, unresolved).at(access.node).on(type_name)),
        }
    }

    /// Resolve `access` on `target` for `args` without caching.
    pub fn resolve(&self, access: &MemberAccess, target: &Value, args: &[Value]) -> Result<ResolvedInvoker, EvalError> {
        let class = self.target_class(access, target)?;
        let shapes = self.shapes_of(args);
        self.resolve_against(access, target, &class, &shapes)
    }

    fn shapes_of(&self, args: &[Value]) -> Vec<TypeShape> {
        args.iter().map(|a| self.types.shape_of(a)).collect()
    }

    /// Resolve through `cache` and invoke.
    ///
    /// A cached invoker is reused as-is; the key covers everything resolution
    /// depends on. A stale invoker is discarded and the access is resolved
    /// once more against the live definition of the target's class.
    pub fn invoke(
        &self,
        cache: &InvocationCache,
        access: &MemberAccess,
        target: &Value,
        args: &[Value],
    ) -> EvalResult {
        let mut class = self.target_class(access, target)?;
        let type_name = self.interner().lookup(class.name());
        let shapes = self.shapes_of(args);
        let key = CacheKey::new(
            access.node,
            class.fingerprint(),
            self.types.shape_of(target),
            shapes.clone(),
        );

        if let Some(invoker) = cache.lookup(&key) {
            debug_assert!(invoker.accepts(&shapes));
            match invoker.try_invoke(target, args) {
                Ok(value) => return Ok(value),
                Err(InvokeFailure::Failed(err)) => return Err(err.at(access.node).on(type_name)),
                Err(InvokeFailure::Stale) => {
                    cache.invalidate(&key);
                    class = self.types.live(&class).ok_or_else(|| {
                        not_found(&access.display(self.interner()), &display_params(&shapes, self.interner()))
                            .at(access.node)
                            .on(type_name)
                    })?;
                    tracing::debug!(node = %access.node, target = type_name, "re-resolving stale member");
                }
            }
        }

        cache.record_resolution();
        tracing::debug!(node = %access.node, target = type_name, "invocation cache miss");
        let invoker = cache.insert(key, self.resolve_against(access, target, &class, &shapes)?);
        invoker.try_invoke(target, args).map_err(|failure| {
            let err = match failure {
                InvokeFailure::Failed(err) => err,
                InvokeFailure::Stale => invocation_failed("member was redefined during invocation"),
            };
            err.at(access.node).on(type_name)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
