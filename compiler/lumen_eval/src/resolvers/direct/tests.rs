use super::*;
use lumen_ir::SharedInterner;
use lumen_types::{ClassBuilder, ObjectRef, Value};
use pretty_assertions::assert_eq;

fn registry() -> (SharedInterner, TypeRegistry) {
    let interner = SharedInterner::new();
    let types = TypeRegistry::with_core_types(interner.clone());
    (interner, types)
}

fn lookup(types: &TypeRegistry, class: &ClassRef, kind: MemberKind, name: &str, args: &[&str]) -> Vec<CandidateMember> {
    let interner = types.interner();
    let target = Value::Object(ObjectRef::new(ClassRef::clone(class)));
    let shapes: Vec<TypeShape> = args.iter().map(|a| TypeShape::parse(a, interner)).collect();
    let request = LookupRequest {
        kind,
        name: interner.intern(name),
        target: &target,
        class,
        arg_shapes: &shapes,
    };
    DirectResolver.resolve(&request, types)
}

fn described(types: &TypeRegistry, candidates: &[CandidateMember]) -> Vec<String> {
    candidates
        .iter()
        .map(|c| c.describe(types.interner()).to_string())
        .collect()
}

fn text(_: &Value, _: &[Value]) -> Result<Value, lumen_types::HostError> {
    Ok(Value::string("x"))
}

#[test]
fn overrides_hide_superclass_declarations() {
    let (interner, types) = registry();
    types.define(
        ClassBuilder::class(&interner, "Base")
            .method("describe", &[], "String", text)
            .method("describe", &["int"], "String", text)
            .build(),
    );
    let derived = types.define(
        ClassBuilder::class(&interner, "Derived")
            .extends("Base")
            .method("describe", &[], "String", text)
            .build(),
    );

    let found = lookup(&types, &derived, MemberKind::Method, "describe", &[]);
    assert_eq!(described(&types, &found), vec!["Derived.describe()"]);

    let found = lookup(&types, &derived, MemberKind::Method, "describe", &["int"]);
    assert_eq!(described(&types, &found), vec!["Base.describe(int)"]);
}

#[test]
fn generated_methods_are_never_matched() {
    let (interner, types) = registry();
    let class = types.define(
        ClassBuilder::class(&interner, "Generated")
            .method_with("run", &[], "void", Modifiers::PUBLIC | Modifiers::SYNTHETIC, text)
            .method_with("run", &["Object"], "void", Modifiers::PUBLIC | Modifiers::BRIDGE, text)
            .build(),
    );
    assert!(lookup(&types, &class, MemberKind::Method, "run", &[]).is_empty());
    assert!(lookup(&types, &class, MemberKind::Method, "run", &["String"]).is_empty());
}

#[test]
fn interfaces_contribute_default_methods_only() {
    let (interner, types) = registry();
    types.define(
        ClassBuilder::interface(&interner, "Named")
            .abstract_method("name", &[], "String")
            .method_with("label", &[], "String", Modifiers::PUBLIC | Modifiers::DEFAULT, text)
            .build(),
    );
    let class = types.define(ClassBuilder::class(&interner, "Tag").implements("Named").build());

    let found = lookup(&types, &class, MemberKind::Method, "label", &[]);
    assert_eq!(described(&types, &found), vec!["Named.label()"]);
    assert!(lookup(&types, &class, MemberKind::Method, "name", &[]).is_empty());
}

#[test]
fn variadic_methods_accept_any_trailing_count() {
    let (interner, types) = registry();
    let class = types.define(
        ClassBuilder::class(&interner, "Calc")
            .method_with("sum", &["int[]"], "int", Modifiers::PUBLIC | Modifiers::VARARGS, text)
            .build(),
    );
    for args in [&[][..], &["int", "int", "int"][..]] {
        let found = lookup(&types, &class, MemberKind::Method, "sum", args);
        assert_eq!(found.len(), 1);
        assert!(found[0].varargs);
    }
}

#[test]
fn private_methods_are_found_but_inaccessible() {
    let (interner, types) = registry();
    let class = types.define(
        ClassBuilder::class(&interner, "Vault")
            .method_with("open", &[], "String", Modifiers::PRIVATE, text)
            .build(),
    );
    let found = lookup(&types, &class, MemberKind::Method, "open", &[]);
    assert_eq!(found.len(), 1);
    assert!(!found[0].accessible);
}

#[test]
fn properties_prefer_getters_over_fields() {
    let (interner, types) = registry();
    let class = types.define(
        ClassBuilder::class(&interner, "Person")
            .private_field("name", "String")
            .field("age", "int")
            .field("active", "boolean")
            .method("getName", &[], "String", text)
            .method("isActive", &[], "boolean", |_, _| Ok(Value::Bool(true)))
            .method("isAge", &[], "int", |_, _| Ok(Value::Int(1)))
            .build(),
    );

    let name = lookup(&types, &class, MemberKind::Property, "name", &[]);
    assert_eq!(described(&types, &name), vec!["Person.getName()"]);

    let active = lookup(&types, &class, MemberKind::Property, "active", &[]);
    assert_eq!(described(&types, &active), vec!["Person.isActive()"]);

    // `isAge` does not return a boolean, so the field is used.
    let age = lookup(&types, &class, MemberKind::Property, "age", &[]);
    assert_eq!(described(&types, &age), vec!["Person.age"]);
    assert!(matches!(age[0].binding, MemberBinding::Field(1)));
}

#[test]
fn private_fields_without_getters_are_inaccessible() {
    let (interner, types) = registry();
    let class = types.define(
        ClassBuilder::class(&interner, "Secret")
            .private_field("token", "String")
            .build(),
    );
    let found = lookup(&types, &class, MemberKind::Property, "token", &[]);
    assert_eq!(found.len(), 1);
    assert!(!found[0].accessible);
}

#[test]
fn properties_take_no_arguments() {
    let (interner, types) = registry();
    let class = types.define(ClassBuilder::class(&interner, "Box").field("size", "int").build());
    assert!(lookup(&types, &class, MemberKind::Property, "size", &["int"]).is_empty());
}

#[test]
fn constructors_filter_by_arity() {
    let (interner, types) = registry();
    let class = types.define(
        ClassBuilder::class(&interner, "Point")
            .constructor(&[], |_, _| Ok(()))
            .constructor(&["int", "int"], |_, _| Ok(()))
            .build(),
    );
    let found = lookup(&types, &class, MemberKind::Constructor, "Point", &["int", "int"]);
    assert_eq!(described(&types, &found), vec!["Point.<init>(int, int)"]);
}

#[test]
fn abstract_classes_and_interfaces_have_no_constructors() {
    let (_, types) = registry();
    let number = types.class_named("Number").unwrap();
    let supplier = types.class_named("Supplier").unwrap();
    assert!(lookup(&types, &number, MemberKind::Constructor, "Number", &[]).is_empty());
    assert!(lookup(&types, &supplier, MemberKind::Constructor, "Supplier", &[]).is_empty());
}

#[test]
fn capitalize_handles_empty_and_unicode() {
    assert_eq!(capitalize("name"), "Name");
    assert_eq!(capitalize(""), "");
    assert_eq!(capitalize("élan"), "Élan");
}
