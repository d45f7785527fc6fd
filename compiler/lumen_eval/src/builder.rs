//! Engine configuration.

use std::sync::Arc;

use lumen_types::SharedTypes;

use crate::engine::Engine;
use crate::resolvers::{FunctionalFallback, MemberResolver, ResolverRegistry};

/// Builder for an `Engine`.
///
/// Custom resolvers run before the built-in strategies, in the order they
/// are added. The resolver list is frozen by `build()`.
pub struct EngineBuilder {
    types: SharedTypes,
    custom: Vec<Arc<dyn MemberResolver>>,
    fallback: FunctionalFallback,
}

impl EngineBuilder {
    pub fn new(types: SharedTypes) -> Self {
        Self {
            types,
            custom: Vec::new(),
            fallback: FunctionalFallback::default(),
        }
    }

    /// Register a resolver ahead of the built-ins.
    #[must_use]
    pub fn resolver<R: MemberResolver + 'static>(mut self, resolver: R) -> Self {
        self.custom.push(Arc::new(resolver));
        self
    }

    /// Which interfaces the functional-interface fallback binds through.
    #[must_use]
    pub fn functional_fallback(mut self, policy: FunctionalFallback) -> Self {
        self.fallback = policy;
        self
    }

    pub fn build(self) -> Engine {
        let resolvers = ResolverRegistry::with_builtins(self.custom, self.fallback);
        tracing::debug!(resolvers = ?resolvers.names(), fallback = ?self.fallback, "built engine");
        Engine::new(self.types, resolvers)
    }
}
