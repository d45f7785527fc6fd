//! Member resolution strategies.
//!
//! A Chain of Responsibility over candidate gathering: each resolver inspects
//! the target and the requested member and produces candidates, and the
//! `ResolverRegistry` returns the first non-empty candidate sequence without
//! merging across strategies.
//!
//! # Resolution Order
//!
//! 1. User-registered resolvers, in registration order (priority 0)
//! 2. `DirectResolver`: methods, properties and constructors by introspection
//!    (priority 1)
//! 3. `IndexerResolver`: element access on arrays, lists, maps and strings
//!    (priority 2)
//! 4. `FunctionalResolver`: the single abstract method of the one interface a
//!    generated class implements (priority 3)
//!
//! A strategy that only finds inaccessible members does not stop the chain;
//! later strategies may still produce an accessible candidate.

mod direct;
mod functional;
mod indexer;

pub use direct::DirectResolver;
pub use functional::{FunctionalFallback, FunctionalResolver};
pub use indexer::IndexerResolver;

use std::sync::Arc;

use lumen_ir::Name;
use lumen_types::{ClassRef, TypeRegistry, TypeShape, Value};

use crate::candidate::{CandidateMember, MemberKind};

/// What is being looked up, and on what.
#[derive(Clone, Copy, Debug)]
pub struct LookupRequest<'a> {
    pub kind: MemberKind,
    /// Member name. For constructors, the class name; for indexers, empty.
    pub name: Name,
    pub target: &'a Value,
    /// The target's runtime class, or the named class for constructors.
    pub class: &'a ClassRef,
    pub arg_shapes: &'a [TypeShape],
}

impl LookupRequest<'_> {
    pub fn argc(&self) -> usize {
        self.arg_shapes.len()
    }
}

/// A candidate-gathering strategy.
///
/// Implementations must be pure queries: the same request against the same
/// registry state yields the same candidates in the same order.
pub trait MemberResolver: Send + Sync {
    fn resolve(&self, request: &LookupRequest<'_>, types: &TypeRegistry) -> Vec<CandidateMember>;

    /// Human-readable name for tracing.
    fn name(&self) -> &'static str;
}

/// The resolvers an engine chains.
///
/// Built-in strategies are enum variants; hosts plug their own in through
/// `Custom`.
#[derive(Clone)]
pub enum ResolverKind {
    Custom(Arc<dyn MemberResolver>),
    Direct(DirectResolver),
    Indexer(IndexerResolver),
    Functional(FunctionalResolver),
}

impl ResolverKind {
    pub fn resolve(&self, request: &LookupRequest<'_>, types: &TypeRegistry) -> Vec<CandidateMember> {
        match self {
            Self::Custom(r) => r.resolve(request, types),
            Self::Direct(r) => r.resolve(request, types),
            Self::Indexer(r) => r.resolve(request, types),
            Self::Functional(r) => r.resolve(request, types),
        }
    }

    /// Lower runs first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Custom(_) => 0,
            Self::Direct(_) => 1,
            Self::Indexer(_) => 2,
            Self::Functional(_) => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Custom(r) => r.name(),
            Self::Direct(r) => r.name(),
            Self::Indexer(r) => r.name(),
            Self::Functional(r) => r.name(),
        }
    }
}

/// Outcome of gathering candidates across the chain.
#[derive(Debug)]
pub enum Gathered {
    /// Accessible candidates from the first strategy that produced any.
    Found {
        resolver: &'static str,
        candidates: Vec<CandidateMember>,
    },
    /// Only inaccessible members matched.
    Inaccessible(Vec<CandidateMember>),
    Empty,
}

/// Ordered, immutable list of resolvers.
///
/// The list is fixed at construction and shared through `Arc`, so engines
/// clone it cheaply and read it without synchronization.
#[derive(Clone)]
pub struct ResolverRegistry {
    resolvers: Arc<Vec<ResolverKind>>,
}

impl ResolverRegistry {
    /// Sort by priority. The sort is stable, so custom resolvers keep their
    /// registration order.
    pub fn new(mut resolvers: Vec<ResolverKind>) -> Self {
        resolvers.sort_by_key(ResolverKind::priority);
        Self {
            resolvers: Arc::new(resolvers),
        }
    }

    /// The built-in chain behind the given custom resolvers.
    pub fn with_builtins(custom: Vec<Arc<dyn MemberResolver>>, fallback: FunctionalFallback) -> Self {
        let mut resolvers: Vec<ResolverKind> = custom.into_iter().map(ResolverKind::Custom).collect();
        resolvers.push(ResolverKind::Direct(DirectResolver));
        resolvers.push(ResolverKind::Indexer(IndexerResolver));
        resolvers.push(ResolverKind::Functional(FunctionalResolver::new(fallback)));
        Self::new(resolvers)
    }

    /// Resolver names in the order they are tried.
    pub fn names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(ResolverKind::name).collect()
    }

    pub fn gather(&self, request: &LookupRequest<'_>, types: &TypeRegistry) -> Gathered {
        let mut inaccessible = Vec::new();
        for resolver in self.resolvers.iter() {
            let candidates = resolver.resolve(request, types);
            if candidates.is_empty() {
                continue;
            }
            let (accessible, hidden): (Vec<_>, Vec<_>) =
                candidates.into_iter().partition(|c| c.accessible);
            if !accessible.is_empty() {
                return Gathered::Found {
                    resolver: resolver.name(),
                    candidates: accessible,
                };
            }
            inaccessible.extend(hidden);
        }
        if inaccessible.is_empty() {
            Gathered::Empty
        } else {
            Gathered::Inaccessible(inaccessible)
        }
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
