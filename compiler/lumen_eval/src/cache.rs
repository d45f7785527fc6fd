//! Invocation cache.
//!
//! Memoizes, per expression node and per observed runtime type, the invoker
//! resolution selected. Entries are never evicted by size; an entry is only
//! discarded when its invoker turns out to be stale.
//!
//! Resolution depends on the target's runtime class, the shape of the target
//! value (arrays resolve against `Object` but index differently) and the
//! argument shapes, so all of them are part of the key. Two evaluations with
//! equal keys always resolve to the same member.
//!
//! Reads take a shared shard lock only. Concurrent misses for one key may
//! both resolve, but the first insert wins and later results are discarded.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lumen_ir::ExprId;
use lumen_types::{TypeFingerprint, TypeShape};
use rustc_hash::FxBuildHasher;

use crate::invoker::ResolvedInvoker;

/// Node identity plus the runtime type the node was evaluated against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub node: ExprId,
    pub fingerprint: TypeFingerprint,
    /// Shape of the target value; `TypeShape::Null` for constructors.
    pub receiver: TypeShape,
    pub args: Box<[TypeShape]>,
}

impl CacheKey {
    pub fn new(
        node: ExprId,
        fingerprint: TypeFingerprint,
        receiver: TypeShape,
        args: impl Into<Box<[TypeShape]>>,
    ) -> Self {
        Self {
            node,
            fingerprint,
            receiver,
            args: args.into(),
        }
    }
}

/// Snapshot of cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Full resolutions performed on behalf of this cache.
    pub resolutions: u64,
    pub invalidations: u64,
    /// Resolutions that lost an insert race.
    pub discarded: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    resolutions: AtomicU64,
    invalidations: AtomicU64,
    discarded: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

pub struct InvocationCache {
    entries: DashMap<CacheKey, Arc<ResolvedInvoker>, FxBuildHasher>,
    counters: Counters,
}

impl InvocationCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher::default()),
            counters: Counters::default(),
        }
    }

    pub fn lookup(&self, key: &CacheKey) -> Option<Arc<ResolvedInvoker>> {
        let found = self.entries.get(key).map(|entry| Arc::clone(entry.value()));
        match &found {
            Some(_) => {
                bump(&self.counters.hits);
                tracing::trace!(node = %key.node, "invocation cache hit");
            }
            None => bump(&self.counters.misses),
        }
        found
    }

    /// Store `invoker` unless another resolution for `key` got there first.
    /// Returns the stored invoker either way.
    pub fn insert(&self, key: CacheKey, invoker: ResolvedInvoker) -> Arc<ResolvedInvoker> {
        let node = key.node;
        match self.entries.entry(key) {
            Entry::Occupied(existing) => {
                bump(&self.counters.discarded);
                tracing::debug!(%node, "discarded concurrent resolution");
                Arc::clone(existing.get())
            }
            Entry::Vacant(slot) => {
                let invoker = Arc::new(invoker);
                slot.insert(Arc::clone(&invoker));
                invoker
            }
        }
    }

    /// Discard the entry for `key`. The next lookup is a miss.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            bump(&self.counters.invalidations);
            tracing::debug!(node = %key.node, "invalidated invocation cache entry");
        }
        removed
    }

    pub(crate) fn record_resolution(&self) {
        bump(&self.counters.resolutions);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        CacheStats {
            hits: load(&self.counters.hits),
            misses: load(&self.counters.misses),
            resolutions: load(&self.counters.resolutions),
            invalidations: load(&self.counters.invalidations),
            discarded: load(&self.counters.discarded),
        }
    }
}

impl Default for InvocationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InvocationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationCache")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats())
            .finish()
    }
}
