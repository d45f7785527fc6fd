//! Sharded string interner.
//!
//! Expressions are parsed once and evaluated from many threads, and
//! evaluation interns derived names (accessor names such as `getName`), so
//! interning takes `&self` and only locks the shard a string hashes to.
//! Interned strings are leaked and live for the rest of the process.

use std::hash::BuildHasher;
use std::ops::Deref;
use std::sync::Arc;
use std::{array, fmt};

use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::Name;

/// Names every registry needs; interning them up front keeps the common
/// lookups on the read-lock path.
const WELL_KNOWN: &[&str] = &[
    "Object", "String", "CharSequence", "Comparable", "Number", "Integer", "Long", "Double",
    "Boolean", "Character", "List", "ArrayList", "Map", "HashMap", "int", "long", "double",
    "boolean", "char", "Supplier", "Function", "Function0", "Runnable", "get", "apply", "invoke",
    "run", "size", "length", "isEmpty",
];

#[derive(Default)]
struct Shard {
    slots: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

pub struct StringInterner {
    shards: [RwLock<Shard>; Name::SHARDS],
}

impl StringInterner {
    pub fn new() -> Self {
        let interner = Self {
            shards: array::from_fn(|_| RwLock::new(Shard::default())),
        };
        // Slot 0 of shard 0 must hold "" for `Name::EMPTY`.
        {
            let mut first = interner.shards[0].write();
            first.slots.insert("", 0);
            first.strings.push("");
        }
        for s in WELL_KNOWN {
            interner.intern(s);
        }
        interner
    }

    fn shard_of(s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let hash = FxBuildHasher.hash_one(s);
        // Top bits of the hash pick the shard.
        u32::try_from(hash >> (u64::BITS - Name::SHARD_BITS)).unwrap_or(0)
    }

    /// Intern `s`, returning the existing name if it was seen before.
    ///
    /// # Panics
    /// Panics if one shard exceeds its slot capacity.
    pub fn intern(&self, s: &str) -> Name {
        let shard = Self::shard_of(s);
        if let Some(name) = self.find(shard, s) {
            return name;
        }

        let mut guard = self.shards[shard as usize].write();
        // Re-check: another thread may have interned `s` between the locks.
        if let Some(&slot) = guard.slots.get(s) {
            return Name::from_parts(shard, slot);
        }
        let slot = match u32::try_from(guard.strings.len()) {
            Ok(slot) if slot <= Name::SLOT_MASK => slot,
            _ => panic!("interner shard {shard} is full"),
        };
        let owned: &'static str = Box::leak(Box::from(s));
        guard.strings.push(owned);
        guard.slots.insert(owned, slot);
        Name::from_parts(shard, slot)
    }

    /// The name of `s` if it was interned, without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.find(Self::shard_of(s), s)
    }

    fn find(&self, shard: u32, s: &str) -> Option<Name> {
        let guard = self.shards[shard as usize].read();
        guard.slots.get(s).map(|&slot| Name::from_parts(shard, slot))
    }

    /// The string behind `name`. Names from another interner read as
    /// `"<unknown>"`.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards
            .get(name.shard())
            .and_then(|shard| shard.read().strings.get(name.slot()).copied())
            .unwrap_or("<unknown>")
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len: usize = self.shards.iter().map(|s| s.read().strings.len()).sum();
        f.debug_struct("StringInterner").field("len", &len).finish()
    }
}

/// Cloneable handle to one interner.
///
/// The type registry, the engine and every expression builder hold one, so a
/// name interned anywhere resolves everywhere.
#[derive(Clone, Default, Debug)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}
