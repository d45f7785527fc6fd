//! Host objects.

use std::fmt;
use std::sync::Arc;

use lumen_ir::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ClassRef;

use super::Value;

struct Object {
    class: ClassRef,
    fields: RwLock<FxHashMap<Name, Value>>,
}

/// Shared handle to a host object.
///
/// The object's runtime class is fixed at allocation. Field storage is
/// interior-mutable so constructors and native methods can write through a
/// shared handle.
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
    pub fn new(class: ClassRef) -> Self {
        ObjectRef(Arc::new(Object {
            class,
            fields: RwLock::new(FxHashMap::default()),
        }))
    }

    /// The runtime class this object was allocated with.
    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    pub fn get_field(&self, name: Name) -> Option<Value> {
        self.0.fields.read().get(&name).cloned()
    }

    pub fn set_field(&self, name: Name, value: Value) {
        self.0.fields.write().insert(name, value);
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = &self.0.class;
        write!(
            f,
            "ObjectRef({:?}@{}, {:p})",
            class.id(),
            class.generation(),
            Arc::as_ptr(&self.0)
        )
    }
}
