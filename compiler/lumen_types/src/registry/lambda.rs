//! Synthetic classes backing closure values.
//!
//! A compiler that lowers a lambda to an object generates a final class that
//! implements the target interface. The implementation method it emits is
//! synthetic, so ordinary reflective matching never sees it under its own
//! name; only dispatch through the interface reaches it.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use lumen_ir::Name;

use crate::{
    ClassBuilder, ClassRef, DefinitionError, HostError, MethodDef, Modifiers, NativeMethod,
    ObjectRef, Value,
};

use super::TypeRegistry;

impl TypeRegistry {
    /// Define the synthetic class for one lambda site.
    ///
    /// The class is named `Owner$$Lambda$N`, implements `interface` and
    /// carries a synthetic implementation of the interface's single abstract
    /// method whose body is `body`. Instantiate it with `ObjectRef::new`;
    /// every instance shares the class, as instances of one lambda site do.
    pub fn define_lambda<F>(
        &self,
        owner: &str,
        interface: Name,
        body: F,
    ) -> Result<ClassRef, DefinitionError>
    where
        F: Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        let interner = self.interner().clone();
        let iface_name = interner.lookup(interface);
        let iface = self
            .lookup(interface)
            .ok_or_else(|| DefinitionError::UnknownType(iface_name.to_owned()))?;
        if !iface.is_interface() {
            return Err(DefinitionError::NotAnInterface(iface_name.to_owned()));
        }

        let required = self.abstract_methods(&iface);
        let [(declaring, index)] = required.as_slice() else {
            return Err(DefinitionError::NotFunctional {
                name: iface_name.to_owned(),
                count: required.len(),
            });
        };
        let Some(sam) = declaring.method(*index) else {
            return Err(DefinitionError::NotFunctional {
                name: iface_name.to_owned(),
                count: 0,
            });
        };

        let body: NativeMethod = Arc::new(body);
        let implementation = MethodDef {
            name: sam.name,
            params: sam.params.clone(),
            return_type: sam.return_type.clone(),
            modifiers: Modifiers::PUBLIC | Modifiers::FINAL | Modifiers::SYNTHETIC,
            body: Some(body),
        };

        let n = self.lambda_counter.fetch_add(1, Ordering::Relaxed);
        let class_name = format!("{owner}$$Lambda${n}");
        let decl = ClassBuilder::class(&interner, &class_name)
            .implements(iface_name)
            .modifiers(Modifiers::FINAL | Modifiers::SYNTHETIC)
            .method_def(implementation)
            .build();
        tracing::debug!(class = %class_name, interface = iface_name, "defined lambda class");
        Ok(self.define(decl))
    }

    /// Define a lambda class and allocate one instance of it.
    pub fn new_lambda<F>(&self, owner: &str, interface: Name, body: F) -> Result<Value, DefinitionError>
    where
        F: Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        let class = self.define_lambda(owner, interface, body)?;
        Ok(Value::Object(ObjectRef::new(class)))
    }
}
