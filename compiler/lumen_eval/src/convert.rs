//! Argument conversion.
//!
//! `classify` answers, from shapes alone, whether and at what cost a value of
//! one shape converts to a parameter shape. Scoring uses it to rank
//! candidates. `convert` applies the same rules to an actual value when an
//! invoker runs; value-level rules such as text parsing can still fail there.
//!
//! Rule priority, first applicable wins:
//! identity, reference widening, primitive widening, boxing and unboxing,
//! text parsing. Packing a variadic tail converts each element with the same
//! rules.

use lumen_ir::StringInterner;
use lumen_types::{Primitive, SharedTypes, TypeRegistry, TypeShape, Value};

use crate::errors::{conversion_failed, EvalError};

/// Cost of an exact shape match.
pub const EXACT: u32 = 0;
/// Cost of primitive widening (`int` to `long`).
pub const WIDENING: u32 = 1;
/// Cost of boxing or unboxing (`int` to `Integer`).
pub const BOXING: u32 = 2;
/// Cost of assigning to a declared supertype (`String` to `Object`).
pub const SUPERTYPE: u32 = 3;
/// Base cost of packing trailing arguments into a variadic array.
pub const VARARGS: u32 = 4;
/// Cost of parsing text into a number, boolean or char.
pub const TEXT_PARSE: u32 = 5;

/// Which rule a conversion applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionKind {
    Identity,
    /// `null` to any reference type.
    Null,
    /// Reference assignable to a declared supertype.
    Supertype,
    /// Primitive widening.
    Widening(Primitive),
    /// Primitive to its wrapper or wrapper to its primitive, optionally
    /// followed by widening to the given primitive.
    Boxing(Option<Primitive>),
    /// Text parsed into the given primitive.
    TextParse(Primitive),
}

/// A classified conversion and its cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub kind: ConversionKind,
    pub cost: u32,
}

impl Conversion {
    const fn new(kind: ConversionKind, cost: u32) -> Self {
        Self { kind, cost }
    }
}

/// Priority-ordered conversion rules over the shared type registry.
#[derive(Clone, Debug)]
pub struct TypeConverter {
    types: SharedTypes,
}

impl TypeConverter {
    pub fn new(types: SharedTypes) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    fn interner(&self) -> &StringInterner {
        self.types.interner()
    }

    /// The primitive a wrapper class boxes, if `shape` names one.
    fn unboxed(&self, shape: &TypeShape) -> Option<Primitive> {
        match shape {
            TypeShape::Class(name) => Primitive::from_wrapper(self.interner().lookup(*name)),
            _ => None,
        }
    }

    fn wrapper_shape(&self, p: Primitive) -> TypeShape {
        TypeShape::Class(self.interner().intern(p.wrapper()))
    }

    fn is_string(&self, shape: &TypeShape) -> bool {
        matches!(shape, TypeShape::Class(name) if *name == self.types.core().string)
    }

    /// Classify the conversion from `from` to `to`, or `None` if no rule
    /// applies.
    pub fn classify(&self, from: &TypeShape, to: &TypeShape) -> Option<Conversion> {
        use ConversionKind as K;

        if from == to {
            return Some(Conversion::new(K::Identity, EXACT));
        }
        if *from == TypeShape::Null {
            return to
                .is_reference()
                .then_some(Conversion::new(K::Null, EXACT));
        }
        if from.is_reference() && to.is_reference() && self.types.is_assignable(from, to) {
            return Some(Conversion::new(K::Supertype, SUPERTYPE));
        }

        match (from.as_primitive(), to.as_primitive()) {
            (Some(a), Some(b)) if a.widens_to(b) => {
                return Some(Conversion::new(K::Widening(b), WIDENING));
            }
            // Boxing: `int` to `Integer`, or to a supertype of `Integer`.
            (Some(a), None) => {
                let boxed = self.wrapper_shape(a);
                if boxed == *to {
                    return Some(Conversion::new(K::Boxing(None), BOXING));
                }
                if self.types.is_assignable(&boxed, to) {
                    return Some(Conversion::new(K::Boxing(None), SUPERTYPE));
                }
            }
            // Unboxing, optionally followed by widening.
            (None, Some(b)) => {
                if let Some(a) = self.unboxed(from) {
                    if a == b {
                        return Some(Conversion::new(K::Boxing(None), BOXING));
                    }
                    if a.widens_to(b) {
                        return Some(Conversion::new(K::Boxing(Some(b)), BOXING + WIDENING));
                    }
                }
            }
            _ => {}
        }

        if self.is_string(from) {
            let target = to.as_primitive().or_else(|| self.unboxed(to));
            if let Some(p) = target {
                return Some(Conversion::new(K::TextParse(p), TEXT_PARSE));
            }
        }
        None
    }

    /// Convert a value to a parameter shape.
    pub fn convert(&self, value: &Value, to: &TypeShape) -> Result<Value, EvalError> {
        let from = self.types.shape_of(value);
        let Some(conversion) = self.classify(&from, to) else {
            return Err(self.mismatch(&from, to));
        };
        match conversion.kind {
            ConversionKind::Identity | ConversionKind::Null | ConversionKind::Supertype => {
                Ok(value.clone())
            }
            ConversionKind::Boxing(None) => Ok(value.clone()),
            ConversionKind::Widening(p) | ConversionKind::Boxing(Some(p)) => {
                widen(value, p).ok_or_else(|| self.mismatch(&from, to))
            }
            ConversionKind::TextParse(p) => {
                let text = value.as_str().unwrap_or_default();
                parse(text, p).ok_or_else(|| {
                    conversion_failed(&format!("\"{text}\""), &to.display(self.interner()).to_string())
                })
            }
        }
    }

    /// Convert `values` element-wise and pack them into an array of
    /// `element`.
    pub fn pack(&self, values: &[Value], element: &TypeShape) -> Result<Value, EvalError> {
        let items = values
            .iter()
            .map(|v| self.convert(v, element))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(element.clone(), items))
    }

    pub(crate) fn mismatch(&self, from: &TypeShape, to: &TypeShape) -> EvalError {
        let interner = self.interner();
        conversion_failed(
            &from.display(interner).to_string(),
            &to.display(interner).to_string(),
        )
    }
}

/// Widen a primitive value. `None` if `value` is not a primitive that widens
/// to `to`.
fn widen(value: &Value, to: Primitive) -> Option<Value> {
    let widened = match (value, to) {
        (Value::Int(i), Primitive::Int) => Value::Int(*i),
        (Value::Long(l), Primitive::Long) => Value::Long(*l),
        (Value::Double(d), Primitive::Double) => Value::Double(*d),
        (Value::Char(c), Primitive::Int) => Value::Int(i32::try_from(u32::from(*c)).ok()?),
        (Value::Char(c), Primitive::Long) => Value::Long(i64::from(u32::from(*c))),
        (Value::Char(c), Primitive::Double) => Value::Double(f64::from(u32::from(*c))),
        (Value::Int(i), Primitive::Long) => Value::Long(i64::from(*i)),
        (Value::Int(i), Primitive::Double) => Value::Double(f64::from(*i)),
        (Value::Long(l), Primitive::Double) => Value::Double(long_to_double(*l)),
        _ => return None,
    };
    Some(widened)
}

#[expect(clippy::cast_precision_loss, reason = "long to double widening may round")]
fn long_to_double(l: i64) -> f64 {
    l as f64
}

fn parse(text: &str, to: Primitive) -> Option<Value> {
    let text = text.trim();
    match to {
        Primitive::Int => text.parse().ok().map(Value::Int),
        Primitive::Long => text.parse().ok().map(Value::Long),
        Primitive::Double => text.parse().ok().map(Value::Double),
        Primitive::Boolean => match text {
            t if t.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
            t if t.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
            _ => None,
        },
        Primitive::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
    }
}
