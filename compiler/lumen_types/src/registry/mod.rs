//! Type registry: type locator and introspector.
//!
//! Answers the questions resolution asks about runtime types: which class a
//! name denotes right now, what a class declares, what its supertypes are, and
//! whether one shape is assignable to another.
//!
//! # Redefinition
//!
//! Defining a name that is already registered retires the previous
//! `ClassDef`, keeps its `ClassId` and bumps the generation. Objects allocated
//! before the redefinition keep pointing at the retired definition; callers
//! that need the current one ask `live()`.

mod core_types;
mod lambda;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use lumen_ir::{Name, SharedInterner};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{ClassDecl, ClassDef, ClassId, ClassKind, ClassRef, ConstructorDef, MethodDef, Modifiers};
use crate::{TypeShape, Value};

pub use self::core_types::CoreNames;

pub struct TypeRegistry {
    interner: SharedInterner,
    classes: RwLock<FxHashMap<Name, ClassRef>>,
    /// Ids survive redefinition and unloading of a name.
    ids: RwLock<FxHashMap<Name, (ClassId, u32)>>,
    next_id: AtomicU32,
    lambda_counter: AtomicU32,
    core: CoreNames,
}

impl TypeRegistry {
    /// An empty registry. Most callers want `with_core_types`.
    pub fn new(interner: SharedInterner) -> Self {
        let core = CoreNames::new(&interner);
        Self {
            interner,
            classes: RwLock::new(FxHashMap::default()),
            ids: RwLock::new(FxHashMap::default()),
            next_id: AtomicU32::new(0),
            lambda_counter: AtomicU32::new(0),
            core,
        }
    }

    /// A registry with `Object`, the wrappers, `String`, the collections and
    /// the functional interfaces installed.
    pub fn with_core_types(interner: SharedInterner) -> Self {
        let registry = Self::new(interner);
        core_types::install(&registry);
        registry
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn core(&self) -> &CoreNames {
        &self.core
    }

    /// Register a class, replacing any previous definition of the same name.
    pub fn define(&self, mut decl: ClassDecl) -> ClassRef {
        if decl.kind == ClassKind::Class
            && decl.constructors.is_empty()
            && !decl.modifiers.contains(Modifiers::ABSTRACT)
        {
            decl.constructors.push(ConstructorDef {
                params: Vec::new(),
                modifiers: Modifiers::PUBLIC,
                body: None,
            });
        }

        let name = decl.name;
        let (id, generation) = {
            let mut ids = self.ids.write();
            let entry = ids
                .entry(name)
                .and_modify(|(_, generation)| *generation = generation.wrapping_add(1))
                .or_insert_with(|| (ClassId(self.next_id.fetch_add(1, Ordering::Relaxed)), 0));
            *entry
        };

        let class = Arc::new(ClassDef::new(id, generation, decl));
        let previous = self.classes.write().insert(name, Arc::clone(&class));
        if let Some(previous) = previous {
            previous.retire();
            tracing::debug!(
                class = self.interner.lookup(name),
                generation,
                "redefined class"
            );
        }
        class
    }

    /// Remove a class. Its definition is retired.
    pub fn unload(&self, name: Name) -> Option<ClassRef> {
        let removed = self.classes.write().remove(&name);
        if let Some(class) = &removed {
            class.retire();
            tracing::debug!(class = self.interner.lookup(name), "unloaded class");
        }
        removed
    }

    pub fn lookup(&self, name: Name) -> Option<ClassRef> {
        self.classes.read().get(&name).cloned()
    }

    pub fn class_named(&self, name: &str) -> Option<ClassRef> {
        self.lookup(self.interner.get(name)?)
    }

    /// The current definition of `class`'s name, if it is still loaded.
    pub fn live(&self, class: &ClassRef) -> Option<ClassRef> {
        if class.is_retired() {
            self.lookup(class.name())
        } else {
            Some(Arc::clone(class))
        }
    }

    /// `class` followed by its superclasses, most derived first.
    ///
    /// Superclasses are looked up by name, so the chain always reflects the
    /// current definitions. Unknown names end the chain.
    pub fn superclass_chain(&self, class: &ClassRef) -> Vec<ClassRef> {
        let mut chain = vec![Arc::clone(class)];
        let mut seen = FxHashSet::default();
        seen.insert(class.name());
        let mut next = class.super_class();
        while let Some(name) = next {
            if !seen.insert(name) {
                break;
            }
            let Some(super_class) = self.lookup(name) else {
                break;
            };
            next = super_class.super_class();
            chain.push(super_class);
        }
        chain
    }

    /// Every interface `class` implements, directly or inherited, in
    /// breadth-first declaration order without duplicates.
    pub fn all_interfaces(&self, class: &ClassRef) -> Vec<ClassRef> {
        let mut seen = FxHashSet::default();
        let mut queue: Vec<Name> = Vec::new();
        for c in self.superclass_chain(class) {
            queue.extend_from_slice(c.interfaces());
        }

        let mut result = Vec::new();
        let mut cursor = 0;
        while let Some(&name) = queue.get(cursor) {
            cursor += 1;
            if !seen.insert(name) {
                continue;
            }
            if let Some(iface) = self.lookup(name) {
                queue.extend_from_slice(iface.interfaces());
                result.push(iface);
            }
        }
        result
    }

    /// The abstract, non-bridge methods an interface requires, including
    /// those inherited from super-interfaces, with overridden signatures
    /// removed. Each entry is `(declaring interface, method index)`.
    pub fn abstract_methods(&self, iface: &ClassRef) -> Vec<(ClassRef, usize)> {
        let mut declaring = vec![Arc::clone(iface)];
        declaring.extend(self.all_interfaces(iface));

        let mut result: Vec<(ClassRef, usize)> = Vec::new();
        let mut concrete: Vec<&MethodDef> = Vec::new();
        for class in &declaring {
            for (index, method) in class.methods().iter().enumerate() {
                if method.modifiers.contains(Modifiers::BRIDGE) {
                    continue;
                }
                let shadowed = result.iter().any(|(c, i)| {
                    c.method(*i).is_some_and(|m| m.same_signature(method))
                }) || concrete.iter().any(|m| m.same_signature(method));
                if shadowed {
                    continue;
                }
                if method.is_abstract() {
                    result.push((Arc::clone(class), index));
                } else {
                    concrete.push(method);
                }
            }
        }
        result
    }

    /// Whether class `from` is `to` or a subtype of it.
    pub fn is_subclass(&self, from: Name, to: Name) -> bool {
        if from == to || to == self.core.object {
            return true;
        }
        let mut seen = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(name) = stack.pop() {
            if !seen.insert(name) {
                continue;
            }
            let Some(class) = self.lookup(name) else {
                continue;
            };
            for parent in class.super_class().iter().chain(class.interfaces()) {
                if *parent == to {
                    return true;
                }
                stack.push(*parent);
            }
        }
        false
    }

    /// Reference assignability between shapes.
    ///
    /// Primitives are assignable only to themselves; widening and boxing are
    /// conversions, not assignability.
    pub fn is_assignable(&self, from: &TypeShape, to: &TypeShape) -> bool {
        match (from, to) {
            _ if from == to => true,
            (TypeShape::Null, to) => to.is_reference(),
            (TypeShape::Class(a), TypeShape::Class(b)) => self.is_subclass(*a, *b),
            (TypeShape::Array(_), TypeShape::Class(b)) => *b == self.core.object,
            (TypeShape::Array(a), TypeShape::Array(b)) => {
                a.is_reference() && b.is_reference() && self.is_assignable(a, b)
            }
            _ => false,
        }
    }

    /// The shape a value presents to conversion and scoring.
    pub fn shape_of(&self, value: &Value) -> TypeShape {
        use crate::Primitive;
        match value {
            Value::Null => TypeShape::Null,
            Value::Bool(_) => TypeShape::Primitive(Primitive::Boolean),
            Value::Char(_) => TypeShape::Primitive(Primitive::Char),
            Value::Int(_) => TypeShape::Primitive(Primitive::Int),
            Value::Long(_) => TypeShape::Primitive(Primitive::Long),
            Value::Double(_) => TypeShape::Primitive(Primitive::Double),
            Value::Str(_) => TypeShape::Class(self.core.string),
            Value::Array { element, .. } => TypeShape::array_of(element.clone()),
            Value::List(_) => TypeShape::Class(self.core.array_list),
            Value::Map(_) => TypeShape::Class(self.core.hash_map),
            Value::Object(o) => TypeShape::Class(o.class().name()),
        }
    }

    /// The class members of `value` are resolved against.
    ///
    /// Primitives resolve against their wrapper class; arrays against
    /// `Object`. `null` has no runtime class.
    pub fn runtime_class(&self, value: &Value) -> Option<ClassRef> {
        let core = &self.core;
        let name = match value {
            Value::Null => return None,
            Value::Object(o) => return Some(Arc::clone(o.class())),
            Value::Bool(_) => core.boolean,
            Value::Char(_) => core.character,
            Value::Int(_) => core.integer,
            Value::Long(_) => core.long,
            Value::Double(_) => core.double,
            Value::Str(_) => core.string,
            Value::Array { .. } => core.object,
            Value::List(_) => core.array_list,
            Value::Map(_) => core.hash_map,
        };
        self.lookup(name)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("classes", &self.classes.read().len())
            .finish_non_exhaustive()
    }
}
