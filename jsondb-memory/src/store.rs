//! In-memory persistence backend.
//!
//! This module provides a backend that keeps flushed state in memory instead of on disk.
//! It is useful for tests and for short-lived stores that should never touch the filesystem.

use log::trace;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use jsondb_core::{
    backend::{Collections, StoreBackend, StoreBackendBuilder},
    collection::Collection,
    document::Document,
    error::JsonDbResult,
};

/// Thread-safe in-memory persistence backend.
///
/// Every flush replaces the stored snapshot with the full state handed over by the store
/// and bumps a flush counter, so callers can observe exactly what would have been written.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses `Arc`-wrapped internal state. Clones share the
/// same snapshot and counter, which lets a test keep a clone while the store owns the
/// original.
///
/// # Example
///
/// ```ignore
/// use jsondb_core::{document::Document, store::DocumentStore};
/// use jsondb_memory::InMemoryStore;
///
/// let backend = InMemoryStore::new();
/// let store = DocumentStore::new(backend.clone())?;
///
/// store.create("posts", Document::from_iter([("title", "super title")]))?;
///
/// assert_eq!(backend.flush_count(), 1);
/// assert_eq!(backend.snapshot(), store.scan());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The last flushed state, or the seed state before the first flush.
    snapshot: Arc<Mutex<Collections>>,
    flushes: Arc<AtomicUsize>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for seeding the backend with initial collections.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns a copy of the last flushed state.
    pub fn snapshot(&self) -> Collections {
        self.snapshot
            .lock()
            .clone()
    }

    /// Returns how many times the store has flushed to this backend.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl StoreBackend for InMemoryStore {
    fn load(&self) -> JsonDbResult<Collections> {
        Ok(self.snapshot())
    }

    fn flush(&self, collections: &Collections) -> JsonDbResult<()> {
        *self.snapshot.lock() = collections.clone();

        let count = self.flushes.fetch_add(1, Ordering::SeqCst) + 1;
        trace!("In-memory flush #{count}");

        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use jsondb_core::{backend::StoreBackendBuilder, document::Document};
/// use jsondb_memory::InMemoryStore;
///
/// let backend = InMemoryStore::builder()
///     .collection("posts", vec![Document::from_iter([("title", "seeded")])])
///     .build()?;
/// ```
#[derive(Default, Debug)]
pub struct InMemoryStoreBuilder {
    collections: Collections,
}

impl InMemoryStoreBuilder {
    /// Seeds a collection. Seeding the same name twice replaces the earlier documents.
    pub fn collection(mut self, name: &str, documents: Vec<Document>) -> Self {
        self.collections
            .insert(name.to_string(), Collection::from(documents));

        self
    }

    /// Seeds the backend with a complete state.
    pub fn collections(mut self, collections: Collections) -> Self {
        self.collections = collections;

        self
    }
}

impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds the backend. Seeding does not count as a flush.
    fn build(self) -> JsonDbResult<Self::Backend> {
        Ok(InMemoryStore {
            snapshot: Arc::new(Mutex::new(self.collections)),
            flushes: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsondb_core::store::DocumentStore;

    fn post(title: &str) -> Document {
        Document::from_iter([("title", title)])
    }

    #[test]
    fn new_backend_loads_empty() {
        let backend = InMemoryStore::new();

        assert!(backend.load().unwrap().is_empty());
        assert_eq!(backend.flush_count(), 0);
    }

    #[test]
    fn seeded_collections_are_loaded() {
        let backend = InMemoryStore::builder()
            .collection("posts", vec![post("seeded")])
            .build()
            .unwrap();

        let store = DocumentStore::new(backend.clone()).unwrap();

        assert_eq!(store.read("posts", None), Some(vec![post("seeded")]));
        assert_eq!(backend.flush_count(), 0);
    }

    #[test]
    fn seeding_a_complete_state() {
        let mut seed = Collections::new();
        seed.insert("posts".to_string(), Collection::from(vec![post("one")]));
        seed.insert("users".to_string(), Collection::new());

        let backend = InMemoryStore::builder()
            .collection("drafts", vec![post("ignored")])
            .collections(seed.clone())
            .build()
            .unwrap();

        let store = DocumentStore::new(backend).unwrap();

        assert_eq!(store.scan(), seed);
        assert_eq!(store.get_all_collections(), "posts, users");
    }

    #[test]
    fn snapshot_tracks_every_mutation() {
        let backend = InMemoryStore::new();
        let store = DocumentStore::new(backend.clone()).unwrap();

        store.create("posts", post("one")).unwrap();
        store
            .get_collection("posts")
            .unwrap()
            .add(post("two"))
            .unwrap();
        store.delete("posts", Some(&post("one"))).unwrap();

        assert_eq!(backend.flush_count(), 3);
        assert_eq!(backend.snapshot(), store.scan());
        assert_eq!(backend.snapshot()["posts"].documents(), [post("two")]);
    }

    #[test]
    fn reopening_round_trips_state() {
        let backend = InMemoryStore::new();
        let first = DocumentStore::new(backend.clone()).unwrap();
        first.create("users", Document::from_iter([("age", 40)])).unwrap();
        first.add_collection("posts").unwrap();

        let second = DocumentStore::new(backend).unwrap();

        assert_eq!(second.scan(), first.scan());
    }
}
