//! Evaluation context.

use lumen_ir::Name;
use lumen_types::{SharedTypes, TypeRegistry, Value};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Root object, variables and the type locator one evaluation runs against.
///
/// Variables are behind a lock so hosts can rebind them between evaluations
/// while the context is shared.
pub struct EvaluationContext {
    root: Value,
    variables: RwLock<FxHashMap<Name, Value>>,
    types: SharedTypes,
}

impl EvaluationContext {
    /// A context with a `null` root and no variables.
    pub fn new(types: SharedTypes) -> Self {
        Self {
            root: Value::Null,
            variables: RwLock::new(FxHashMap::default()),
            types,
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: Value) -> Self {
        self.root = root;
        self
    }

    #[must_use]
    pub fn with_variable(self, name: &str, value: Value) -> Self {
        self.set_variable(name, value);
        self
    }

    pub fn set_variable(&self, name: &str, value: Value) {
        let name = self.types.interner().intern(name);
        self.variables.write().insert(name, value);
    }

    /// The value bound to `name`; unbound names read as `null`.
    pub fn variable(&self, name: Name) -> Value {
        self.variables.read().get(&name).cloned().unwrap_or(Value::Null)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }
}

impl std::fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("root", &self.root)
            .field("variables", &self.variables.read().len())
            .finish_non_exhaustive()
    }
}
