//! Class metadata as seen through introspection.
//!
//! A `ClassDef` is immutable once registered. Redefining or unloading a class
//! retires its `ClassDef`; anything bound to a retired definition is stale.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lumen_ir::Name;

use crate::{HostError, Modifiers, ObjectRef, TypeShape, Value};

/// Body of a native method: `(receiver, arguments) -> result`.
pub type NativeMethod = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync>;

/// Body of a native constructor, run against a freshly allocated object.
pub type NativeConstructor = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<(), HostError> + Send + Sync>;

/// Shared handle to a registered class.
pub type ClassRef = Arc<ClassDef>;

/// Stable identity of a class name within one registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

/// Identity of one definition of a class.
///
/// Redefinition keeps the `ClassId` and bumps `generation`, so two
/// fingerprints are equal only for the same definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeFingerprint {
    pub id: ClassId,
    pub generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone)]
pub struct MethodDef {
    pub name: Name,
    pub params: Vec<TypeShape>,
    pub return_type: TypeShape,
    pub modifiers: Modifiers,
    /// `None` for abstract methods.
    pub body: Option<NativeMethod>,
}

impl MethodDef {
    pub fn is_abstract(&self) -> bool {
        self.body.is_none() || self.modifiers.contains(Modifiers::ABSTRACT)
    }

    pub fn is_varargs(&self) -> bool {
        self.modifiers.contains(Modifiers::VARARGS)
    }

    /// Same name and identical parameter shapes.
    pub fn same_signature(&self, other: &MethodDef) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("modifiers", &self.modifiers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: Name,
    pub ty: TypeShape,
    pub modifiers: Modifiers,
}

#[derive(Clone)]
pub struct ConstructorDef {
    pub params: Vec<TypeShape>,
    pub modifiers: Modifiers,
    /// `None` for the implicit no-op constructor.
    pub body: Option<NativeConstructor>,
}

impl ConstructorDef {
    pub fn is_varargs(&self) -> bool {
        self.modifiers.contains(Modifiers::VARARGS)
    }
}

impl fmt::Debug for ConstructorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDef")
            .field("params", &self.params)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

/// Unregistered class declaration, produced by `ClassBuilder`.
#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub name: Name,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub super_class: Option<Name>,
    pub interfaces: Vec<Name>,
    pub methods: Vec<MethodDef>,
    pub fields: Vec<FieldDef>,
    pub constructors: Vec<ConstructorDef>,
}

/// A registered class definition.
pub struct ClassDef {
    id: ClassId,
    generation: u32,
    decl: ClassDecl,
    retired: AtomicBool,
}

impl ClassDef {
    pub(crate) fn new(id: ClassId, generation: u32, decl: ClassDecl) -> Self {
        Self {
            id,
            generation,
            decl,
            retired: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn fingerprint(&self) -> TypeFingerprint {
        TypeFingerprint {
            id: self.id,
            generation: self.generation,
        }
    }

    pub fn name(&self) -> Name {
        self.decl.name
    }

    pub fn kind(&self) -> ClassKind {
        self.decl.kind
    }

    pub fn is_interface(&self) -> bool {
        self.decl.kind == ClassKind::Interface
    }

    pub fn modifiers(&self) -> Modifiers {
        self.decl.modifiers
    }

    pub fn super_class(&self) -> Option<Name> {
        self.decl.super_class
    }

    pub fn interfaces(&self) -> &[Name] {
        &self.decl.interfaces
    }

    pub fn methods(&self) -> &[MethodDef] {
        &self.decl.methods
    }

    pub fn method(&self, index: usize) -> Option<&MethodDef> {
        self.decl.methods.get(index)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.decl.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDef> {
        self.decl.fields.get(index)
    }

    pub fn constructors(&self) -> &[ConstructorDef] {
        &self.decl.constructors
    }

    pub fn constructor(&self, index: usize) -> Option<&ConstructorDef> {
        self.decl.constructors.get(index)
    }

    /// Whether this definition was replaced or unloaded.
    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::Acquire)
    }

    pub(crate) fn retire(&self) {
        self.retired.store(true, Ordering::Release);
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("name", &self.decl.name)
            .field("kind", &self.decl.kind)
            .field("retired", &self.is_retired())
            .finish_non_exhaustive()
    }
}
