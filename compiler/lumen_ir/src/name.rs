//! Interned identifiers.
//!
//! Member names, type names and string literals are all interned, so the
//! resolver compares and hashes 32-bit ids instead of strings.

use std::fmt;

/// Handle to a string owned by a `StringInterner`.
///
/// The high `SHARD_BITS` select the interner shard; the rest index into it.
/// Handles are only meaningful for the interner that issued them.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    pub(crate) const SHARD_BITS: u32 = 4;
    pub(crate) const SHARDS: usize = 1 << Self::SHARD_BITS;
    const SLOT_BITS: u32 = u32::BITS - Self::SHARD_BITS;
    pub(crate) const SLOT_MASK: u32 = (1 << Self::SLOT_BITS) - 1;

    /// The empty string. Always slot 0 of shard 0.
    pub const EMPTY: Name = Name(0);

    pub(crate) const fn from_parts(shard: u32, slot: u32) -> Self {
        debug_assert!((shard as usize) < Self::SHARDS);
        debug_assert!(slot <= Self::SLOT_MASK);
        Name(shard << Self::SLOT_BITS | slot)
    }

    pub(crate) const fn shard(self) -> usize {
        (self.0 >> Self::SLOT_BITS) as usize
    }

    pub(crate) const fn slot(self) -> usize {
        (self.0 & Self::SLOT_MASK) as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}/{})", self.shard(), self.slot())
    }
}
