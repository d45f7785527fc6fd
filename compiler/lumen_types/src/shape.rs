//! Type shapes: the static description of a parameter, field or argument.
//!
//! Class shapes refer to classes by interned name, never by `ClassRef`, so a
//! shape outlives redefinition of the class it names.

use std::fmt;

use lumen_ir::{Name, StringInterner};

/// Primitive value types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Char,
    Int,
    Long,
    Double,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Boolean,
        Primitive::Char,
        Primitive::Int,
        Primitive::Long,
        Primitive::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Double => "double",
        }
    }

    /// Name of the wrapper class that boxes this primitive.
    pub fn wrapper(self) -> &'static str {
        match self {
            Primitive::Boolean => "Boolean",
            Primitive::Char => "Character",
            Primitive::Int => "Integer",
            Primitive::Long => "Long",
            Primitive::Double => "Double",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == s)
    }

    pub fn from_wrapper(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.wrapper() == s)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Primitive::Int | Primitive::Long | Primitive::Double)
    }

    /// Strict primitive widening: `char -> int -> long -> double`, `int -> double`.
    pub fn widens_to(self, to: Primitive) -> bool {
        matches!(
            (self, to),
            (Primitive::Char, Primitive::Int | Primitive::Long | Primitive::Double)
                | (Primitive::Int, Primitive::Long | Primitive::Double)
                | (Primitive::Long, Primitive::Double)
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Shape of a value or declared type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// The shape of the `null` literal.
    Null,
    /// Return type of members that produce nothing.
    Void,
    Primitive(Primitive),
    Class(Name),
    Array(Box<TypeShape>),
}

impl TypeShape {
    pub fn array_of(element: TypeShape) -> Self {
        TypeShape::Array(Box::new(element))
    }

    /// Parse a type spelling such as `int`, `String` or `String[]`.
    pub fn parse(spelling: &str, interner: &StringInterner) -> Self {
        let spelling = spelling.trim();
        if let Some(element) = spelling.strip_suffix("[]") {
            return Self::array_of(Self::parse(element, interner));
        }
        match spelling {
            "void" => TypeShape::Void,
            "null" => TypeShape::Null,
            other => match Primitive::from_keyword(other) {
                Some(p) => TypeShape::Primitive(p),
                None => TypeShape::Class(interner.intern(other)),
            },
        }
    }

    /// Whether values of this shape are references (nullable).
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeShape::Class(_) | TypeShape::Array(_) | TypeShape::Null)
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            TypeShape::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> ShapeDisplay<'a> {
        ShapeDisplay {
            shape: self,
            interner,
        }
    }
}

/// Helper for displaying a `TypeShape` with resolved names.
pub struct ShapeDisplay<'a> {
    shape: &'a TypeShape,
    interner: &'a StringInterner,
}

impl fmt::Display for ShapeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            TypeShape::Null => f.write_str("null"),
            TypeShape::Void => f.write_str("void"),
            TypeShape::Primitive(p) => write!(f, "{p}"),
            TypeShape::Class(name) => f.write_str(self.interner.lookup(*name)),
            TypeShape::Array(element) => write!(f, "{}[]", element.display(self.interner)),
        }
    }
}

/// Render a parameter list as `(int, String[])`.
pub fn display_params(params: &[TypeShape], interner: &StringInterner) -> String {
    let parts: Vec<String> = params
        .iter()
        .map(|p| p.display(interner).to_string())
        .collect();
    format!("({})", parts.join(", "))
}
