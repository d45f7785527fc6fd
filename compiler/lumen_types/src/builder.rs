//! Fluent construction of class declarations.
//!
//! Type spellings are parsed with `TypeShape::parse`, so `"int"`, `"String"`
//! and `"String[]"` are all accepted wherever a type is expected.

use std::sync::Arc;

use lumen_ir::StringInterner;

use crate::{
    ClassDecl, ClassKind, ConstructorDef, FieldDef, HostError, MethodDef, Modifiers, ObjectRef,
    TypeShape, Value,
};

pub struct ClassBuilder<'i> {
    interner: &'i StringInterner,
    decl: ClassDecl,
}

impl<'i> ClassBuilder<'i> {
    /// A public class extending `Object`.
    pub fn class(interner: &'i StringInterner, name: &str) -> Self {
        let object = interner.intern("Object");
        Self::new(interner, name, ClassKind::Class, Some(object))
    }

    /// A public interface.
    pub fn interface(interner: &'i StringInterner, name: &str) -> Self {
        Self::new(interner, name, ClassKind::Interface, None)
    }

    fn new(
        interner: &'i StringInterner,
        name: &str,
        kind: ClassKind,
        super_class: Option<lumen_ir::Name>,
    ) -> Self {
        Self {
            interner,
            decl: ClassDecl {
                name: interner.intern(name),
                kind,
                modifiers: Modifiers::PUBLIC,
                super_class,
                interfaces: Vec::new(),
                methods: Vec::new(),
                fields: Vec::new(),
                constructors: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn extends(mut self, name: &str) -> Self {
        self.decl.super_class = Some(self.interner.intern(name));
        self
    }

    /// Declare the root of the hierarchy (no superclass).
    #[must_use]
    pub fn root(mut self) -> Self {
        self.decl.super_class = None;
        self
    }

    #[must_use]
    pub fn implements(mut self, name: &str) -> Self {
        self.decl.interfaces.push(self.interner.intern(name));
        self
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.decl.modifiers = modifiers;
        self
    }

    /// A public method with a native body.
    #[must_use]
    pub fn method<F>(self, name: &str, params: &[&str], ret: &str, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.method_with(name, params, ret, Modifiers::PUBLIC, body)
    }

    /// A method with explicit modifiers and a native body.
    #[must_use]
    pub fn method_with<F>(
        mut self,
        name: &str,
        params: &[&str],
        ret: &str,
        modifiers: Modifiers,
        body: F,
    ) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        let method = MethodDef {
            name: self.interner.intern(name),
            params: self.shapes(params),
            return_type: TypeShape::parse(ret, self.interner),
            modifiers,
            body: Some(Arc::new(body)),
        };
        self.decl.methods.push(method);
        self
    }

    /// A public abstract method.
    #[must_use]
    pub fn abstract_method(mut self, name: &str, params: &[&str], ret: &str) -> Self {
        let method = MethodDef {
            name: self.interner.intern(name),
            params: self.shapes(params),
            return_type: TypeShape::parse(ret, self.interner),
            modifiers: Modifiers::PUBLIC | Modifiers::ABSTRACT,
            body: None,
        };
        self.decl.methods.push(method);
        self
    }

    /// Add a fully formed method, e.g. one copied from an interface.
    #[must_use]
    pub fn method_def(mut self, method: MethodDef) -> Self {
        self.decl.methods.push(method);
        self
    }

    #[must_use]
    pub fn field(self, name: &str, ty: &str) -> Self {
        self.field_with(name, ty, Modifiers::PUBLIC)
    }

    #[must_use]
    pub fn private_field(self, name: &str, ty: &str) -> Self {
        self.field_with(name, ty, Modifiers::PRIVATE)
    }

    #[must_use]
    pub fn field_with(mut self, name: &str, ty: &str, modifiers: Modifiers) -> Self {
        let field = FieldDef {
            name: self.interner.intern(name),
            ty: TypeShape::parse(ty, self.interner),
            modifiers,
        };
        self.decl.fields.push(field);
        self
    }

    #[must_use]
    pub fn constructor<F>(self, params: &[&str], body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), HostError> + Send + Sync + 'static,
    {
        self.constructor_with(params, Modifiers::PUBLIC, body)
    }

    #[must_use]
    pub fn constructor_with<F>(mut self, params: &[&str], modifiers: Modifiers, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), HostError> + Send + Sync + 'static,
    {
        let ctor = ConstructorDef {
            params: self.shapes(params),
            modifiers,
            body: Some(Arc::new(body)),
        };
        self.decl.constructors.push(ctor);
        self
    }

    pub fn build(self) -> ClassDecl {
        self.decl
    }

    fn shapes(&self, spellings: &[&str]) -> Vec<TypeShape> {
        spellings
            .iter()
            .map(|s| TypeShape::parse(s, self.interner))
            .collect()
    }
}
