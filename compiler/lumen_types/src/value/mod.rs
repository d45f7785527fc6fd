//! Runtime values.
//!
//! Primitive values are stored unboxed; boxing only changes the static shape
//! a value is viewed through, never its representation. Heap values share
//! their payload through `Arc`, so cloning a `Value` is cheap and values can
//! cross threads.

mod object;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{Primitive, TypeShape};

pub use object::ObjectRef;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(Arc<str>),
    /// Fixed-shape array, e.g. a packed variadic tail.
    Array {
        element: TypeShape,
        items: Arc<Vec<Value>>,
    },
    /// Ordered sequence (`ArrayList`).
    List(Arc<Vec<Value>>),
    /// Mapping with text keys (`HashMap`).
    Map(Arc<FxHashMap<String, Value>>),
    Object(ObjectRef),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    pub fn array(element: TypeShape, items: Vec<Value>) -> Self {
        Value::Array {
            element,
            items: Arc::new(items),
        }
    }

    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Map(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn object(object: ObjectRef) -> Self {
        Value::Object(object)
    }

    /// Zero value of a declared type: `0`, `false`, `'\0'` or `null`.
    pub fn default_for(shape: &TypeShape) -> Self {
        match shape.as_primitive() {
            Some(Primitive::Boolean) => Value::Bool(false),
            Some(Primitive::Char) => Value::Char('\0'),
            Some(Primitive::Int) => Value::Int(0),
            Some(Primitive::Long) => Value::Long(0),
            Some(Primitive::Double) => Value::Double(0.0),
            None => Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Short description of the representation, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Str(_) => "String",
            Value::Array { .. } => "array",
            Value::List(_) => "ArrayList",
            Value::Map(_) => "HashMap",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Str(s) => f.write_str(s),
            Value::Array { items, .. } | Value::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Map(entries) => {
                let mut parts: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
                parts.sort();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Object(o) => write!(f, "{o:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
