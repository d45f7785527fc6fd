//! Lumen Types - the runtime type model the Lumen evaluator resolves against.
//!
//! - `TypeRegistry`: class lookup, hierarchy queries, assignability and
//!   redefinition
//! - `ClassDef` / `MethodDef` / `FieldDef` / `ConstructorDef`: introspected
//!   metadata
//! - `ClassBuilder`: fluent declaration of host classes
//! - `Value` / `ObjectRef`: runtime values
//! - `TypeShape`: static shapes used by conversion and scoring

mod builder;
mod class;
mod error;
mod modifiers;
mod registry;
mod shape;
mod shared;
mod value;

pub use builder::ClassBuilder;
pub use class::{
    ClassDecl, ClassDef, ClassId, ClassKind, ClassRef, ConstructorDef, FieldDef, MethodDef,
    NativeConstructor, NativeMethod, TypeFingerprint,
};
pub use error::{DefinitionError, HostError};
pub use modifiers::Modifiers;
pub use registry::{CoreNames, TypeRegistry};
pub use shape::{display_params, Primitive, ShapeDisplay, TypeShape};
pub use shared::{SharedRegistry, SharedTypes};
pub use value::{ObjectRef, Value};
