//! Property-based tests for conversion and selection.
//!
//! Generated argument values check that conversion preserves values and that
//! selection depends only on argument shapes, never on the values themselves.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

#[allow(dead_code, reason = "each test binary uses a subset of the fixtures")]
mod common;

use common::Host;
use lumen_eval::TypeConverter;
use lumen_types::{Primitive, TypeShape, Value};
use proptest::prelude::*;

fn converter(host: &Host) -> TypeConverter {
    TypeConverter::new(host.types.clone())
}

proptest! {
    #[test]
    fn widening_preserves_the_value(n in any::<i32>()) {
        let host = Host::new();
        let conv = converter(&host);
        prop_assert_eq!(
            conv.convert(&Value::Int(n), &TypeShape::Primitive(Primitive::Long)).unwrap(),
            Value::Long(i64::from(n))
        );
        prop_assert_eq!(
            conv.convert(&Value::Int(n), &TypeShape::Primitive(Primitive::Double)).unwrap(),
            Value::Double(f64::from(n))
        );
    }

    #[test]
    fn integral_text_parses_back(n in any::<i64>(), pad in 0usize..3) {
        let host = Host::new();
        let conv = converter(&host);
        let text = format!("{}{n}{}", " ".repeat(pad), " ".repeat(pad));
        prop_assert_eq!(
            conv.convert(&Value::string(&text), &TypeShape::Primitive(Primitive::Long)).unwrap(),
            Value::Long(n)
        );
    }

    #[test]
    fn any_tail_length_is_packed(count in 0usize..12) {
        let host = Host::new();
        let expr = host.expr(|b| {
            let mut args = vec![b.string("t")];
            for i in 0..count {
                let arg = if i % 2 == 0 { b.string("x") } else { b.long(7) };
                args.push(arg);
            }
            b.call(None, "format", args)
        });
        prop_assert_eq!(
            host.eval(&expr, &host.context()).unwrap(),
            Value::string(&format!("t:{count}"))
        );
    }

    #[test]
    fn selection_ignores_argument_values(text in ".*", number in any::<i32>()) {
        let host = Host::new();
        let context = host.context();
        let expr = host.expr(|b| {
            let arg = b.var("arg");
            b.call(None, "describe", vec![arg])
        });

        context.set_variable("arg", Value::string(&text));
        prop_assert_eq!(host.eval(&expr, &context).unwrap(), Value::string("string"));
        context.set_variable("arg", Value::Int(number));
        prop_assert_eq!(host.eval(&expr, &context).unwrap(), Value::string("object"));
        prop_assert_eq!(expr.cache().stats().resolutions, 2);
    }
}
