//! Host fixtures shared by the integration tests.
//!
//! `Config` mirrors a typical host class: plain methods, overloads, a
//! variadic formatter, a private member, a property with a getter and two
//! factory methods returning closure objects. One closure implements the
//! marked `Supplier` interface; the other implements the unmarked
//! `Function0` interface some compilers emit for their function types.

use lumen_eval::{Engine, EvalError, EvalResult, EvaluationContext, Expression, FunctionalFallback};
use lumen_ir::{ExprBuilder, ExprId, SharedInterner};
use lumen_types::{
    ClassBuilder, ClassRef, HostError, Modifiers, ObjectRef, SharedRegistry, SharedTypes,
    TypeRegistry, Value,
};

pub struct Host {
    pub interner: SharedInterner,
    pub types: SharedTypes,
    pub engine: Engine,
    pub config: ClassRef,
}

impl Host {
    pub fn new() -> Self {
        Self::with_fallback(FunctionalFallback::default())
    }

    pub fn with_fallback(fallback: FunctionalFallback) -> Self {
        lumen_eval::init_tracing();
        let interner = SharedInterner::new();
        let types = SharedRegistry::new(TypeRegistry::with_core_types(interner.clone()));
        let config = define_config(&interner, &types);
        let engine = Engine::builder(types.clone())
            .functional_fallback(fallback)
            .build();
        Self {
            interner,
            types,
            engine,
            config,
        }
    }

    pub fn config_object(&self) -> Value {
        Value::Object(ObjectRef::new(ClassRef::clone(&self.config)))
    }

    /// A context rooted at a fresh `Config`.
    pub fn context(&self) -> EvaluationContext {
        EvaluationContext::new(self.types.clone()).with_root(self.config_object())
    }

    /// Build an expression; `build` returns the node producing its value.
    pub fn expr(&self, build: impl FnOnce(&mut ExprBuilder<'_>) -> ExprId) -> Expression {
        let mut builder = ExprBuilder::new(&self.interner);
        let root = build(&mut builder);
        Expression::new(builder.finish(), root)
    }

    pub fn eval(&self, expr: &Expression, context: &EvaluationContext) -> EvalResult {
        expr.get_value(&self.engine, context)
    }

    pub fn eval_err(&self, expr: &Expression, context: &EvaluationContext) -> EvalError {
        match self.eval(expr, context) {
            Ok(value) => panic!("expected an error, got {value}"),
            Err(err) => err,
        }
    }
}

fn text_arg(args: &[Value], index: usize) -> Result<&str, HostError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| HostError::unexpected_argument(index, "String"))
}

fn define_config(interner: &SharedInterner, types: &TypeRegistry) -> ClassRef {
    let supplier = types
        .define_lambda("Config", interner.intern("Supplier"), |_, _| Ok(Value::string("test")))
        .ok();
    let function0 = types
        .define_lambda("Config", interner.intern("Function0"), |_, _| Ok(Value::string("test")))
        .ok();
    let instance = |class: Option<ClassRef>| {
        move |_: &Value, _: &[Value]| {
            class
                .clone()
                .map(|c| Value::Object(ObjectRef::new(c)))
                .ok_or_else(|| HostError::new("lambda class missing"))
        }
    };
    let name = interner.intern("name");

    types.define(
        ClassBuilder::class(interner, "Config")
            .private_field("name", "String")
            .constructor(&[], move |object, _| {
                object.set_field(name, Value::string("config"));
                Ok(())
            })
            .method("getName", &[], "String", move |recv, _| {
                Ok(recv
                    .as_object()
                    .and_then(|o| o.get_field(name))
                    .unwrap_or(Value::Null))
            })
            .method("supplier", &[], "Supplier", instance(supplier))
            .method("kotlinSupplier", &[], "Function0", instance(function0))
            .method("greet", &["String"], "String", |_, args| {
                Ok(Value::string(&format!("Hello, {}", text_arg(args, 0)?)))
            })
            .method("describe", &["Object"], "String", |_, _| Ok(Value::string("object")))
            .method("describe", &["String"], "String", |_, _| Ok(Value::string("string")))
            .method("pair", &["Object", "String"], "String", |_, _| Ok(Value::string("first")))
            .method("pair", &["String", "Object"], "String", |_, _| Ok(Value::string("second")))
            .method("twice", &["int"], "int", |_, args| match args.first() {
                Some(Value::Int(i)) => Ok(Value::Int(i * 2)),
                _ => Err(HostError::unexpected_argument(0, "int")),
            })
            .method_with(
                "format",
                &["String", "Object[]"],
                "String",
                Modifiers::PUBLIC | Modifiers::VARARGS,
                |_, args| {
                    let template = text_arg(args, 0)?;
                    let count = match args.get(1) {
                        Some(Value::Array { items, .. }) => items.len(),
                        _ => return Err(HostError::unexpected_argument(1, "Object[]")),
                    };
                    Ok(Value::string(&format!("{template}:{count}")))
                },
            )
            .method_with("secret", &[], "String", Modifiers::PRIVATE, |_, _| {
                Ok(Value::string("hidden"))
            })
            .build(),
    )
}
