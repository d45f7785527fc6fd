use super::*;
use crate::errors::EvalErrorKind;
use crate::resolvers::{FunctionalFallback, MemberResolver};
use lumen_ir::SharedInterner;
use lumen_types::{ClassBuilder, HostError, Modifiers, ObjectRef, Primitive, SharedRegistry};
use pretty_assertions::assert_eq;

fn tag(label: &'static str) -> impl Fn(&Value, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static {
    move |_, _| Ok(Value::string(label))
}

fn sum(_: &Value, args: &[Value]) -> Result<Value, HostError> {
    match args.first() {
        Some(Value::Array { items, .. }) => Ok(Value::Int(
            items
                .iter()
                .map(|v| match v {
                    Value::Int(i) => *i,
                    _ => 0,
                })
                .sum(),
        )),
        _ => Err(HostError::unexpected_argument(0, "int[]")),
    }
}

struct Fixture {
    interner: SharedInterner,
    types: SharedTypes,
    engine: Engine,
    calc: Value,
}

impl Fixture {
    fn new() -> Self {
        let interner = SharedInterner::new();
        let types = SharedRegistry::new(TypeRegistry::with_core_types(interner.clone()));
        let varargs = Modifiers::PUBLIC | Modifiers::VARARGS;
        let class = types.define(
            ClassBuilder::class(&interner, "Calc")
                .method("foo", &["Object"], "String", tag("object"))
                .method("foo", &["String"], "String", tag("string"))
                .method("bar", &["long"], "String", tag("long"))
                .method("bar", &["Integer"], "String", tag("Integer"))
                .method("pick", &["Object", "String"], "String", tag("first"))
                .method("pick", &["String", "Object"], "String", tag("second"))
                .method_with("sum", &["int[]"], "int", varargs, sum)
                .method("join", &["String"], "String", tag("single"))
                .method_with("join", &["String[]"], "String", varargs, tag("many"))
                .method("num", &["int"], "int", |_, args| Ok(args[0].clone()))
                .method("two", &["int"], "String", tag("int"))
                .method("two", &["boolean"], "String", tag("boolean"))
                .method_with("hidden", &[], "String", Modifiers::PRIVATE, tag("hidden"))
                .build(),
        );
        let engine = Engine::builder(types.clone()).build();
        Self {
            interner,
            types,
            engine,
            calc: Value::Object(ObjectRef::new(class)),
        }
    }

    fn method(&self, node: u32, name: &str) -> MemberAccess {
        MemberAccess::new(ExprId::new(node), MemberKind::Method, self.interner.intern(name))
    }

    fn resolve(&self, name: &str, args: &[Value]) -> Result<ResolvedInvoker, EvalError> {
        self.engine.resolve(&self.method(0, name), &self.calc, args)
    }

    fn call(&self, name: &str, args: &[Value]) -> EvalResult {
        self.resolve(name, args)?.invoke(&self.calc, args)
    }
}

#[test]
fn most_specific_reference_parameter_wins() {
    let fx = Fixture::new();
    assert_eq!(fx.call("foo", &[Value::string("a")]).unwrap(), Value::string("string"));
    assert_eq!(fx.call("foo", &[Value::Int(1)]).unwrap(), Value::string("object"));
}

#[test]
fn widening_beats_boxing() {
    let fx = Fixture::new();
    let invoker = fx.resolve("bar", &[Value::Int(1)]).unwrap();
    assert_eq!(invoker.score(), crate::convert::WIDENING);
    assert_eq!(invoker.invoke(&fx.calc, &[Value::Int(1)]).unwrap(), Value::string("long"));
}

/// `foo(Object)` and `foo(String)` are not a tie for a `String` argument:
/// the exact match costs `EXACT` and the upcast `SUPERTYPE`, so `foo(String)`
/// wins (see `most_specific_reference_parameter_wins`). A tie needs both
/// candidates to pay the same total, as `pick(Object, String)` and
/// `pick(String, Object)` do for two strings.
#[test]
fn equally_good_candidates_are_ambiguous() {
    let fx = Fixture::new();
    let err = fx
        .resolve("pick", &[Value::string("a"), Value::string("b")])
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::Ambiguous {
            member: "pick".into(),
            candidates: vec![
                "Calc.pick(Object, String)".into(),
                "Calc.pick(String, Object)".into()
            ],
        }
    );
    assert_eq!(err.node, Some(ExprId::new(0)));
    assert_eq!(err.target_type.as_deref(), Some("Calc"));
}

#[test]
fn variadic_tails_are_packed() {
    let fx = Fixture::new();
    let three = [Value::Int(1), Value::Int(2), Value::Int(3)];
    let invoker = fx.resolve("sum", &three).unwrap();
    assert!(invoker.plan().packs());
    assert_eq!(invoker.score(), VARARGS);
    assert_eq!(invoker.invoke(&fx.calc, &three).unwrap(), Value::Int(6));

    assert_eq!(fx.call("sum", &[]).unwrap(), Value::Int(0));
}

#[test]
fn arrays_pass_straight_to_the_variadic_parameter() {
    let fx = Fixture::new();
    let array = Value::array(
        TypeShape::Primitive(Primitive::Int),
        vec![Value::Int(4), Value::Int(5)],
    );
    let invoker = fx.resolve("sum", std::slice::from_ref(&array)).unwrap();
    assert!(!invoker.plan().packs());
    assert_eq!(invoker.score(), 0);
    assert_eq!(invoker.invoke(&fx.calc, &[array]).unwrap(), Value::Int(9));
}

#[test]
fn fixed_arity_beats_variadic() {
    let fx = Fixture::new();
    assert_eq!(fx.call("join", &[Value::string("a")]).unwrap(), Value::string("single"));
    assert_eq!(
        fx.call("join", &[Value::string("a"), Value::string("b"), Value::string("c")]).unwrap(),
        Value::string("many")
    );
    assert_eq!(fx.call("join", &[]).unwrap(), Value::string("many"));
}

#[test]
fn unparsable_text_is_a_conversion_error() {
    let fx = Fixture::new();
    let cache = InvocationCache::new();
    let err = fx
        .engine
        .invoke(&cache, &fx.method(0, "num"), &fx.calc, &[Value::string("abc")])
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::Conversion {
            from: "\"abc\"".into(),
            to: "int".into()
        }
    );
    assert_eq!(err.target_type.as_deref(), Some("Calc"));

    let parsed = fx
        .engine
        .invoke(&cache, &fx.method(0, "num"), &fx.calc, &[Value::string("42")])
        .unwrap();
    assert_eq!(parsed, Value::Int(42));
}

#[test]
fn single_unconvertible_candidate_reports_the_conversion() {
    let fx = Fixture::new();
    let err = fx.resolve("num", &[Value::list(Vec::new())]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::Conversion {
            from: "ArrayList".into(),
            to: "int".into()
        }
    );
}

#[test]
fn several_unconvertible_candidates_report_not_found() {
    let fx = Fixture::new();
    let err = fx.resolve("two", &[Value::list(Vec::new())]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotFound {
            member: "two".into(),
            arguments: "(ArrayList)".into()
        }
    );
}

#[test]
fn private_members_are_denied() {
    let fx = Fixture::new();
    let err = fx.resolve("hidden", &[]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::AccessDenied {
            member: "Calc.hidden()".into()
        }
    );
}

#[test]
fn unknown_members_are_not_found() {
    let fx = Fixture::new();
    let err = fx.resolve("missing", &[Value::Int(1)]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotFound {
            member: "missing".into(),
            arguments: "(int)".into()
        }
    );
    assert_eq!(
        err.to_string(),
        "no member `missing` accepting (int) (on Calc at #0)"
    );
}

#[test]
fn null_targets_and_unknown_types_fail_early() {
    let fx = Fixture::new();
    let err = fx
        .engine
        .resolve(&fx.method(2, "foo"), &Value::Null, &[])
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NullTarget {
            member: "foo".into()
        }
    );
    assert_eq!(err.node, Some(ExprId::new(2)));

    let access = MemberAccess::new(
        ExprId::new(3),
        MemberKind::Constructor,
        fx.interner.intern("Nowhere"),
    );
    let err = fx.engine.resolve(&access, &Value::Null, &[]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnknownType {
            name: "Nowhere".into()
        }
    );
}

#[test]
fn cached_path_resolves_once_per_type() {
    let fx = Fixture::new();
    let cache = InvocationCache::new();
    let access = fx.method(0, "foo");
    for _ in 0..3 {
        let value = fx
            .engine
            .invoke(&cache, &access, &fx.calc, &[Value::string("a")])
            .unwrap();
        assert_eq!(value, Value::string("string"));
    }
    let stats = cache.stats();
    assert_eq!(stats.resolutions, 1);
    assert_eq!(stats.hits, 2);
}

#[test]
fn each_argument_shape_gets_its_own_entry() {
    let fx = Fixture::new();
    let cache = InvocationCache::new();
    let access = fx.method(0, "foo");

    for _ in 0..2 {
        let text = fx.engine.invoke(&cache, &access, &fx.calc, &[Value::string("a")]);
        let number = fx.engine.invoke(&cache, &access, &fx.calc, &[Value::Int(1)]);
        assert_eq!(text.unwrap(), Value::string("string"));
        assert_eq!(number.unwrap(), Value::string("object"));
    }

    let stats = cache.stats();
    assert_eq!(stats.resolutions, 2);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.invalidations, 0);
    assert_eq!(cache.len(), 2);
}

#[test]
fn arrays_and_objects_index_through_separate_entries() {
    let fx = Fixture::new();
    let cache = InvocationCache::new();
    let access = MemberAccess::new(ExprId::new(0), MemberKind::Indexer, Name::EMPTY);
    let int = TypeShape::Primitive(Primitive::Int);
    let array = Value::array(int, vec![Value::Int(7)]);
    let object = Value::Object(ObjectRef::new(fx.types.class_named("Object").unwrap()));

    let first = fx.engine.invoke(&cache, &access, &array, &[Value::Int(0)]);
    assert_eq!(first.unwrap(), Value::Int(7));

    let err = fx
        .engine
        .invoke(&cache, &access, &object, &[Value::Int(0)])
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotFound {
            member: "[]".into(),
            arguments: "(int)".into(),
        }
    );
    assert_eq!(cache.stats().resolutions, 2);
}

#[test]
fn stale_invokers_re_resolve_against_the_live_class() {
    let fx = Fixture::new();
    let i = &fx.interner;
    let config = fx
        .types
        .define(ClassBuilder::class(i, "Config").method("name", &[], "String", tag("v1")).build());
    let old = Value::Object(ObjectRef::new(config));
    let cache = InvocationCache::new();
    let access = fx.method(0, "name");

    assert_eq!(fx.engine.invoke(&cache, &access, &old, &[]).unwrap(), Value::string("v1"));

    fx.types
        .define(ClassBuilder::class(i, "Config").method("name", &[], "String", tag("v2")).build());
    assert_eq!(fx.engine.invoke(&cache, &access, &old, &[]).unwrap(), Value::string("v2"));
    assert_eq!(cache.stats().resolutions, 2);
    assert_eq!(cache.stats().invalidations, 1);
}

#[test]
fn unloaded_classes_are_not_found() {
    let fx = Fixture::new();
    let i = &fx.interner;
    let config = fx
        .types
        .define(ClassBuilder::class(i, "Config").method("name", &[], "String", tag("v1")).build());
    let name = config.name();
    let old = Value::Object(ObjectRef::new(config));
    let cache = InvocationCache::new();
    let access = fx.method(0, "name");

    fx.engine.invoke(&cache, &access, &old, &[]).unwrap();
    fx.types.unload(name);
    let err = fx.engine.invoke(&cache, &access, &old, &[]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::NotFound { .. }));
    assert!(cache.is_empty());
}

/// Resolves `answer` on anything to a fixed value.
struct Answer;

impl MemberResolver for Answer {
    fn resolve(&self, request: &LookupRequest<'_>, types: &TypeRegistry) -> Vec<CandidateMember> {
        if types.interner().lookup(request.name) != "length" {
            return Vec::new();
        }
        let Some(class) = types.class_named("Answer") else {
            return Vec::new();
        };
        vec![CandidateMember {
            kind: request.kind,
            declaring: class,
            params: Vec::new(),
            varargs: false,
            accessible: true,
            binding: crate::candidate::MemberBinding::Method(0),
        }]
    }

    fn name(&self) -> &'static str {
        "Answer"
    }
}

#[test]
fn custom_resolvers_take_precedence() {
    let fx = Fixture::new();
    fx.types.define(
        ClassBuilder::class(&fx.interner, "Answer")
            .method("length", &[], "int", |_, _| Ok(Value::Int(42)))
            .build(),
    );
    let engine = Engine::builder(fx.types.clone())
        .resolver(Answer)
        .functional_fallback(FunctionalFallback::Disabled)
        .build();
    assert_eq!(
        engine.resolvers().names(),
        vec!["Answer", "DirectResolver", "IndexerResolver", "FunctionalResolver"]
    );

    let access = MemberAccess::new(ExprId::new(0), MemberKind::Method, fx.interner.intern("length"));
    let text = Value::string("abc");
    let value = engine.resolve(&access, &text, &[]).unwrap().invoke(&text, &[]).unwrap();
    assert_eq!(value, Value::Int(42));
    let builtin = fx.engine.resolve(&access, &text, &[]).unwrap().invoke(&text, &[]).unwrap();
    assert_eq!(builtin, Value::Int(3));
}
