//! Core classes every registry starts with.

use lumen_ir::{Name, StringInterner};

use crate::{ClassBuilder, HostError, Modifiers, Value};

use super::TypeRegistry;

/// Pre-interned names of the core classes.
#[derive(Clone, Copy, Debug)]
pub struct CoreNames {
    pub object: Name,
    pub string: Name,
    pub number: Name,
    pub integer: Name,
    pub long: Name,
    pub double: Name,
    pub boolean: Name,
    pub character: Name,
    pub array_list: Name,
    pub hash_map: Name,
}

impl CoreNames {
    pub(super) fn new(interner: &StringInterner) -> Self {
        Self {
            object: interner.intern("Object"),
            string: interner.intern("String"),
            number: interner.intern("Number"),
            integer: interner.intern("Integer"),
            long: interner.intern("Long"),
            double: interner.intern("Double"),
            boolean: interner.intern("Boolean"),
            character: interner.intern("Character"),
            array_list: interner.intern("ArrayList"),
            hash_map: interner.intern("HashMap"),
        }
    }
}

fn str_receiver(receiver: &Value) -> Result<&str, HostError> {
    receiver
        .as_str()
        .ok_or_else(|| HostError::unexpected_receiver("String"))
}

fn items_receiver(receiver: &Value) -> Result<&[Value], HostError> {
    match receiver {
        Value::List(items) => Ok(items.as_slice()),
        _ => Err(HostError::unexpected_receiver("ArrayList")),
    }
}

fn len_value(len: usize) -> Result<Value, HostError> {
    i32::try_from(len)
        .map(Value::Int)
        .map_err(|_| HostError::new("length exceeds int range"))
}

fn int_arg(args: &[Value], index: usize) -> Result<i32, HostError> {
    match args.get(index) {
        Some(Value::Int(i)) => Ok(*i),
        _ => Err(HostError::unexpected_argument(index, "int")),
    }
}

fn map_key(args: &[Value]) -> Result<String, HostError> {
    match args.first() {
        Some(Value::Str(s)) => Ok(s.to_string()),
        Some(Value::Null) | None => Err(HostError::unexpected_argument(0, "String")),
        Some(other) => Ok(other.to_string()),
    }
}

pub(super) fn install(registry: &TypeRegistry) {
    let interner = registry.interner().clone();
    let i = &*interner;

    registry.define(ClassBuilder::class(i, "Object").root().build());

    // Interfaces
    registry.define(ClassBuilder::interface(i, "CharSequence").abstract_method("length", &[], "int").build());
    registry.define(ClassBuilder::interface(i, "Comparable").abstract_method("compareTo", &["Object"], "int").build());
    registry.define(ClassBuilder::interface(i, "List").abstract_method("size", &[], "int").build());
    registry.define(ClassBuilder::interface(i, "Map").abstract_method("size", &[], "int").build());

    let functional = Modifiers::PUBLIC | Modifiers::FUNCTIONAL;
    registry.define(
        ClassBuilder::interface(i, "Supplier")
            .modifiers(functional)
            .abstract_method("get", &[], "Object")
            .build(),
    );
    registry.define(
        ClassBuilder::interface(i, "Function")
            .modifiers(functional)
            .abstract_method("apply", &["Object"], "Object")
            .build(),
    );
    registry.define(
        ClassBuilder::interface(i, "Runnable")
            .modifiers(functional)
            .abstract_method("run", &[], "void")
            .build(),
    );
    // Closure type of compilers that do not mark their function types.
    registry.define(
        ClassBuilder::interface(i, "Function0")
            .abstract_method("invoke", &[], "Object")
            .build(),
    );

    // Numbers and wrappers
    registry.define(
        ClassBuilder::class(i, "Number")
            .modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT)
            .build(),
    );
    registry.define(
        ClassBuilder::class(i, "Integer")
            .extends("Number")
            .implements("Comparable")
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .method("intValue", &[], "int", |recv, _| match recv {
                Value::Int(v) => Ok(Value::Int(*v)),
                _ => Err(HostError::unexpected_receiver("Integer")),
            })
            .build(),
    );
    for wrapper in ["Long", "Double"] {
        registry.define(
            ClassBuilder::class(i, wrapper)
                .extends("Number")
                .implements("Comparable")
                .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
                .build(),
        );
    }
    for wrapper in ["Boolean", "Character"] {
        registry.define(
            ClassBuilder::class(i, wrapper)
                .implements("Comparable")
                .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
                .build(),
        );
    }

    registry.define(
        ClassBuilder::class(i, "String")
            .implements("CharSequence")
            .implements("Comparable")
            .modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .method("length", &[], "int", |recv, _| {
                len_value(str_receiver(recv)?.chars().count())
            })
            .method("isEmpty", &[], "boolean", |recv, _| {
                Ok(Value::Bool(str_receiver(recv)?.is_empty()))
            })
            .method("toUpperCase", &[], "String", |recv, _| {
                Ok(Value::string(&str_receiver(recv)?.to_uppercase()))
            })
            .method("charAt", &["int"], "char", |recv, args| {
                let s = str_receiver(recv)?;
                let index = int_arg(args, 0)?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(Value::Char)
                    .ok_or_else(|| HostError::new(format!("index {index} out of bounds")))
            })
            .method("concat", &["String"], "String", |recv, args| {
                let s = str_receiver(recv)?;
                let other = args
                    .first()
                    .and_then(Value::as_str)
                    .ok_or_else(|| HostError::unexpected_argument(0, "String"))?;
                Ok(Value::string(&format!("{s}{other}")))
            })
            .build(),
    );

    registry.define(
        ClassBuilder::class(i, "ArrayList")
            .implements("List")
            .method("size", &[], "int", |recv, _| len_value(items_receiver(recv)?.len()))
            .method("isEmpty", &[], "boolean", |recv, _| {
                Ok(Value::Bool(items_receiver(recv)?.is_empty()))
            })
            .method("get", &["int"], "Object", |recv, args| {
                let items = items_receiver(recv)?;
                let index = int_arg(args, 0)?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .ok_or_else(|| HostError::new(format!("index {index} out of bounds")))
            })
            .build(),
    );

    registry.define(
        ClassBuilder::class(i, "HashMap")
            .implements("Map")
            .method("size", &[], "int", |recv, _| match recv {
                Value::Map(entries) => len_value(entries.len()),
                _ => Err(HostError::unexpected_receiver("HashMap")),
            })
            .method("get", &["Object"], "Object", |recv, args| match recv {
                Value::Map(entries) => Ok(entries.get(&map_key(args)?).cloned().unwrap_or(Value::Null)),
                _ => Err(HostError::unexpected_receiver("HashMap")),
            })
            .method("containsKey", &["Object"], "boolean", |recv, args| match recv {
                Value::Map(entries) => Ok(Value::Bool(entries.contains_key(&map_key(args)?))),
                _ => Err(HostError::unexpected_receiver("HashMap")),
            })
            .build(),
    );
}
