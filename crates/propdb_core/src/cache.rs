//! Pluggable caching of whole records.

use crate::entity::EntityId;
use crate::record::Record;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Where loaded records may be kept between reads.
///
/// Records go in and come out whole, keyed by identity. Coherence across
/// processes is the implementation's concern.
pub trait CacheStrategy<R: Record>: Send + Sync {
    /// A copy of the cached record, if any.
    fn get(&self, id: &EntityId) -> Option<R>;

    /// Stores a record under its identity, replacing any previous entry.
    fn put(&self, record: R);

    /// Drops the entry for `id`.
    fn invalidate(&self, id: &EntityId);
}

/// Caches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl<R: Record> CacheStrategy<R> for NoCache {
    fn get(&self, _id: &EntityId) -> Option<R> {
        None
    }

    fn put(&self, _record: R) {}

    fn invalidate(&self, _id: &EntityId) {}
}

/// Process-local cache behind a read/write lock.
#[derive(Debug)]
pub struct LocalCache<R> {
    entries: RwLock<HashMap<EntityId, R>>,
}

impl<R> LocalCache<R> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<R> Default for LocalCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record + Clone + Send + Sync> CacheStrategy<R> for LocalCache<R> {
    fn get(&self, id: &EntityId) -> Option<R> {
        self.entries.read().get(id).cloned()
    }

    fn put(&self, record: R) {
        let id = record.id().clone();
        self.entries.write().insert(id, record);
    }

    fn invalidate(&self, id: &EntityId) {
        self.entries.write().remove(id);
    }
}
