//! Cache Store Module
//!
//! Storage backends for [`CacheEntry`] values. Stores never look at freshness:
//! an expired entry is returned like any other and the middleware decides
//! what to do with it.

use dashmap::DashMap;

use super::{CacheEntry, CacheError};

/// A keyed store of cache entries shared by concurrent requests.
///
/// Every method takes `&self`; implementations make each call atomic on its
/// own. Readers get an owned copy of the entry and write changes back with
/// [`set`](Self::set).
pub trait CacheStore: Send + Sync {
    /// Returns the entry stored under `id`.
    ///
    /// # Errors
    ///
    /// [`CacheError::NotFound`] when nothing is stored under `id`.
    fn get(&self, id: &str) -> Result<CacheEntry, CacheError>;

    /// Inserts `entry`, replacing whatever was stored under its id.
    fn set(&self, entry: CacheEntry) -> Result<(), CacheError>;
}

/// A store that can also drop entries and report its size.
pub trait CollectableStore: CacheStore {
    /// Removes and returns the entry stored under `id`.
    fn remove(&self, id: &str) -> Option<CacheEntry>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes `entry` from the store. Returns `true` if it was present.
    fn delete(&self, entry: &CacheEntry) -> bool {
        self.remove(entry.id()).is_some()
    }
}

/// Process-local store backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for InMemoryStore {
    fn get(&self, id: &str) -> Result<CacheEntry, CacheError> {
        self.entries
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CacheError::not_found(id))
    }

    fn set(&self, entry: CacheEntry) -> Result<(), CacheError> {
        self.entries.insert(entry.id().to_owned(), entry);
        Ok(())
    }
}

/// [`InMemoryStore`] with removal, for hosts that invalidate entries when a
/// resource changes.
#[derive(Debug, Default)]
pub struct CollectableInMemoryStore {
    inner: InMemoryStore,
}

impl CollectableInMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for CollectableInMemoryStore {
    fn get(&self, id: &str) -> Result<CacheEntry, CacheError> {
        self.inner.get(id)
    }

    fn set(&self, entry: CacheEntry) -> Result<(), CacheError> {
        self.inner.set(entry)
    }
}

impl CollectableStore for CollectableInMemoryStore {
    fn remove(&self, id: &str) -> Option<CacheEntry> {
        self.inner.entries.remove(id).map(|(_, entry)| entry)
    }

    fn len(&self) -> usize {
        self.inner.entries.len()
    }
}
