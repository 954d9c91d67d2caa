//! Time-bounded cache of loaded record stores
//!
//! Replaces an implicit global memo with an explicit object owned by the
//! data-loading side. Entries never block readers: a stale entry is still
//! returned, flagged, until it is reloaded or invalidated.

use super::{EntityKind, LoadResult, RecordStore};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached store and the instant it was inserted
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub store: Arc<RecordStore>,
    pub inserted_at: Instant,
}

/// TTL cache keyed by entity kind
pub struct RecordCache {
    entries: Mutex<LruCache<EntityKind, CacheEntry>>,
    ttl: Duration,
}

impl RecordCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<EntityKind, CacheEntry>> {
        // A panic while holding the lock cannot leave an entry half-written
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached store for `kind` and whether it has outlived the TTL
    pub fn get(&self, kind: EntityKind) -> Option<(Arc<RecordStore>, bool)> {
        let mut entries = self.lock();
        entries.get(&kind).map(|entry| {
            let is_stale = entry.inserted_at.elapsed() >= self.ttl;
            (Arc::clone(&entry.store), is_stale)
        })
    }

    /// Insert (or replace) the store for its kind. Last writer wins.
    pub fn insert(&self, store: RecordStore) -> Arc<RecordStore> {
        let kind = store.kind;
        let store = Arc::new(store);
        self.lock().put(
            kind,
            CacheEntry {
                store: Arc::clone(&store),
                inserted_at: Instant::now(),
            },
        );
        store
    }

    /// Fresh cached store, or the result of `load` inserted into the cache.
    ///
    /// The lock is not held while `load` runs; concurrent loads of the same
    /// kind are allowed and the last one to finish is kept.
    pub fn get_or_load<F>(&self, kind: EntityKind, load: F) -> LoadResult<Arc<RecordStore>>
    where
        F: FnOnce() -> LoadResult<RecordStore>,
    {
        match self.get(kind) {
            Some((store, false)) => return Ok(store),
            Some((_, true)) => debug!(kind = %kind, "Cache entry stale; reloading"),
            None => debug!(kind = %kind, "Cache miss; loading"),
        }
        let store = load()?;
        Ok(self.insert(store))
    }

    /// Drop every cached store
    pub fn invalidate(&self) {
        self.lock().clear();
    }

    /// Drop the cached store for one kind
    pub fn invalidate_kind(&self, kind: EntityKind) {
        self.lock().pop(&kind);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
