//! Thread-safe shared registry handle.

use std::fmt;
use std::sync::Arc;

/// Shared, immutable handle to a registry.
///
/// Registries mutate through interior locks, so one handle can be cloned
/// into every engine and evaluation thread.
pub struct SharedRegistry<T>(Arc<T>);

impl<T> SharedRegistry<T> {
    pub fn new(registry: T) -> Self {
        SharedRegistry(Arc::new(registry))
    }
}

impl<T> Clone for SharedRegistry<T> {
    fn clone(&self) -> Self {
        SharedRegistry(Arc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for SharedRegistry<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedRegistry({:?})", &*self.0)
    }
}

/// Registry of runtime types shared between engines and threads.
pub type SharedTypes = SharedRegistry<crate::TypeRegistry>;
