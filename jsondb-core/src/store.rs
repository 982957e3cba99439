//! Main document store interface.
//!
//! [`DocumentStore`] owns the authoritative in-memory collections and a [`StoreBackend`].
//! It reads the backend exactly once, on construction, and flushes the *full* state back
//! to it after every mutation before the mutating call returns. The in-memory mapping and
//! the last flushed content are therefore always equal.
//!
//! Lookups against a collection that does not exist are not errors: [`read`],
//! [`update`], [`delete`] and [`get_collection`] return `None` and log a warning.
//! Construction failures and I/O failures are returned as errors.
//!
//! [`read`]: DocumentStore::read
//! [`update`]: DocumentStore::update
//! [`delete`]: DocumentStore::delete
//! [`get_collection`]: DocumentStore::get_collection
//!
//! # Example
//!
//! ```ignore
//! use jsondb_core::{store::DocumentStore, document::Document};
//!
//! let store = DocumentStore::new(backend)?;
//! store.create("posts", Document::from_iter([("title", "super title")]))?;
//!
//! let posts = store.read("posts", None);
//! assert_eq!(posts.map(|p| p.len()), Some(1));
//! ```

use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    backend::{Collections, StoreBackend, StoreBackendBuilder},
    collection::Collection,
    document::{Document, Filter},
    error::JsonDbResult,
    persistent::PersistentCollection,
};

/// Message returned by [`DocumentStore::get_all_collections`] when the store is empty.
pub const EMPTY_DATABASE_MESSAGE: &str = "Database is empty. There are no collections.";

/// State shared by a store, its clones and every collection handle it hands out.
#[derive(Debug)]
pub(crate) struct StoreState<B: StoreBackend> {
    backend: B,
    collections: Mutex<Collections>,
}

impl<B: StoreBackend> StoreState<B> {
    /// Runs `op` against the named collection and flushes the full mapping, all under
    /// one lock. Returns `Ok(None)` without flushing if the collection does not exist
    /// and `create_missing` is false.
    pub(crate) fn mutate<T>(
        &self,
        name: &str,
        create_missing: bool,
        op: impl FnOnce(&mut Collection) -> T,
    ) -> JsonDbResult<Option<T>> {
        let mut collections = self.collections.lock();

        let collection = if create_missing {
            collections
                .entry(name.to_string())
                .or_default()
        } else {
            match collections.get_mut(name) {
                Some(collection) => collection,
                None => return Ok(None),
            }
        };

        let result = op(collection);
        self.flush(&collections)?;

        Ok(Some(result))
    }

    /// Runs a read-only `op` against the named collection.
    pub(crate) fn inspect<T>(&self, name: &str, op: impl FnOnce(&Collection) -> T) -> Option<T> {
        self.collections
            .lock()
            .get(name)
            .map(op)
    }

    fn flush(&self, collections: &Collections) -> JsonDbResult<()> {
        debug!(
            "Flushing {} collection(s) to {}",
            collections.len(),
            self.backend.location()
        );

        self.backend.flush(collections)
    }
}

/// A document store bound to a specific persistence backend.
///
/// Cloning a store is cheap; clones share the same collections and backend.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    state: Arc<StoreState<B>>,
}

impl<B: StoreBackend> Clone for DocumentStore<B> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a store over `backend`, loading its persisted collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot load. No store is returned in that case.
    pub fn new(backend: B) -> JsonDbResult<Self> {
        let collections = backend.load()?;

        debug!(
            "Loaded {} collection(s) from {}",
            collections.len(),
            backend.location()
        );

        Ok(Self {
            state: Arc::new(StoreState {
                backend,
                collections: Mutex::new(collections),
            }),
        })
    }

    /// Builds a backend from `builder` and opens a store over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder rejects its configuration or the backend cannot load.
    pub fn open<T>(builder: T) -> JsonDbResult<Self>
    where
        T: StoreBackendBuilder<Backend = B>,
    {
        Self::new(builder.build()?)
    }

    /// Returns the backend this store persists to.
    pub fn backend(&self) -> &B {
        &self.state.backend
    }

    /// Returns a persistent handle to the named collection.
    ///
    /// Mutations made through the handle are flushed like any other store mutation.
    /// Returns `None` if the collection does not exist.
    pub fn get_collection(&self, name: &str) -> Option<PersistentCollection<B>> {
        if !self.does_collection_exist(name) {
            warn!("A collection {name} does not exist");

            return None;
        }

        Some(PersistentCollection::new(name.to_string(), Arc::clone(&self.state)))
    }

    /// Inserts `document` into the named collection, creating the collection first if
    /// needed, and returns the inserted document.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    ///
    /// If the flush fails the change stays in memory, so the store is ahead of the backend
    /// until the next successful flush.
    pub fn create(&self, name: &str, document: Document) -> JsonDbResult<Document> {
        let inserted = document.clone();

        self.state.mutate(name, true, move |collection| {
            collection.add(document);
        })?;

        Ok(inserted)
    }

    /// Creates an empty collection and flushes.
    ///
    /// Logs a warning and does nothing if the collection already exists.
    pub fn add_collection(&self, name: &str) -> JsonDbResult<()> {
        let mut collections = self.state.collections.lock();

        if collections.contains_key(name) {
            warn!("A collection {name} already exists");

            return Ok(());
        }

        collections.insert(name.to_string(), Collection::new());

        self.state.flush(&collections)
    }

    /// Removes a collection and flushes.
    ///
    /// Logs a warning and does nothing if the collection does not exist. Handles to the
    /// removed collection become detached.
    pub fn remove_collection(&self, name: &str) -> JsonDbResult<()> {
        let mut collections = self.state.collections.lock();

        if collections.shift_remove(name).is_none() {
            warn!("A collection {name} does not exist");

            return Ok(());
        }

        self.state.flush(&collections)
    }

    pub fn does_collection_exist(&self, name: &str) -> bool {
        self.state
            .collections
            .lock()
            .contains_key(name)
    }

    /// Returns the collection names in insertion order.
    pub fn collection_names(&self) -> Vec<String> {
        self.state
            .collections
            .lock()
            .keys()
            .cloned()
            .collect()
    }

    /// Returns the collection names joined with `", "`, or [`EMPTY_DATABASE_MESSAGE`] if
    /// there are none.
    pub fn get_all_collections(&self) -> String {
        let names = self.collection_names();

        if names.is_empty() {
            return EMPTY_DATABASE_MESSAGE.to_string();
        }

        names.join(", ")
    }

    /// Returns the documents of the named collection matching `filter`.
    ///
    /// Returns `None` if the collection does not exist.
    pub fn read(&self, name: &str, filter: Option<&Filter>) -> Option<Vec<Document>> {
        let documents = self
            .state
            .inspect(name, |collection| collection.read(filter));

        if documents.is_none() {
            warn!("A collection {name} does not exist");
        }

        documents
    }

    /// Merges `patch` into every matching document of the named collection and flushes.
    ///
    /// Returns the updated documents, or `None` if the collection does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    ///
    /// If the flush fails the change stays in memory, so the store is ahead of the backend
    /// until the next successful flush.
    pub fn update(
        &self,
        name: &str,
        patch: &Document,
        filter: Option<&Filter>,
    ) -> JsonDbResult<Option<Vec<Document>>> {
        let updated = self
            .state
            .mutate(name, false, |collection| collection.update(patch, filter))?;

        if updated.is_none() {
            warn!("A collection {name} does not exist");
        }

        Ok(updated)
    }

    /// Removes every matching document from the named collection and flushes.
    ///
    /// Returns the removed documents, or `None` if the collection does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    ///
    /// If the flush fails the change stays in memory, so the store is ahead of the backend
    /// until the next successful flush.
    pub fn delete(&self, name: &str, filter: Option<&Filter>) -> JsonDbResult<Option<Vec<Document>>> {
        let removed = self
            .state
            .mutate(name, false, |collection| collection.delete(filter))?;

        if removed.is_none() {
            warn!("A collection {name} does not exist");
        }

        Ok(removed)
    }

    /// Returns a snapshot of the entire in-memory state.
    pub fn scan(&self) -> Collections {
        self.state
            .collections
            .lock()
            .clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{document::Value, error::JsonDbError};
    use std::io;

    /// Records every flush; optionally fails them.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub(crate) initial: Collections,
        pub(crate) flushes: Mutex<Vec<Collections>>,
        pub(crate) fail_flushes: bool,
    }

    impl RecordingBackend {
        pub(crate) fn with(initial: Collections) -> Self {
            Self { initial, ..Default::default() }
        }

        pub(crate) fn flush_count(&self) -> usize {
            self.flushes.lock().len()
        }

        pub(crate) fn last_flush(&self) -> Option<Collections> {
            self.flushes.lock().last().cloned()
        }
    }

    impl StoreBackend for RecordingBackend {
        fn load(&self) -> JsonDbResult<Collections> {
            Ok(self.initial.clone())
        }

        fn flush(&self, collections: &Collections) -> JsonDbResult<()> {
            if self.fail_flushes {
                return Err(io::Error::new(io::ErrorKind::StorageFull, "disk full").into());
            }

            self.flushes.lock().push(collections.clone());

            Ok(())
        }

        fn location(&self) -> String {
            "recording".to_string()
        }
    }

    fn person(name: &str, age: i64) -> Document {
        Document::from_iter([
            ("name", Value::from(name)),
            ("age", Value::from(age)),
        ])
    }

    fn users_store() -> DocumentStore<RecordingBackend> {
        let mut initial = Collections::new();
        initial.insert(
            "users".to_string(),
            Collection::from(vec![person("A", 25), person("B", 40), person("C", 40)]),
        );

        DocumentStore::new(RecordingBackend::with(initial)).unwrap()
    }

    #[test]
    fn construction_does_not_flush() {
        let store = users_store();

        assert_eq!(store.backend().flush_count(), 0);
        assert_eq!(store.scan().len(), 1);
    }

    #[test]
    fn create_makes_collection_and_flushes_once() {
        let store = DocumentStore::new(RecordingBackend::default()).unwrap();
        let post = Document::from_iter([("title", "super title")]);

        let created = store.create("posts", post.clone()).unwrap();

        assert_eq!(created, post);
        assert_eq!(store.read("posts", None), Some(vec![post.clone()]));
        assert_eq!(store.backend().flush_count(), 1);
        assert_eq!(store.backend().last_flush(), Some(store.scan()));
    }

    #[test]
    fn read_missing_collection_is_none() {
        let store = users_store();

        assert_eq!(store.read("posts", None), None);
        assert!(store.get_collection("posts").is_none());
    }

    #[test]
    fn read_with_unmatched_filter_is_empty() {
        let store = users_store();
        let filter = Document::from_iter([("name", "Z")]);

        assert_eq!(store.read("users", Some(&filter)), Some(vec![]));
    }

    #[test]
    fn delete_removes_matches_and_flushes_remaining_state() {
        let store = users_store();
        let filter = Document::from_iter([("age", 40)]);

        let removed = store.delete("users", Some(&filter)).unwrap();

        assert_eq!(removed, Some(vec![person("B", 40), person("C", 40)]));
        assert_eq!(store.read("users", None), Some(vec![person("A", 25)]));

        let flushed = store.backend().last_flush().unwrap();
        assert_eq!(flushed["users"].documents(), [person("A", 25)]);
    }

    #[test]
    fn update_merges_and_flushes() {
        let store = users_store();
        let patch = Document::from_iter([("age", 26)]);
        let filter = Document::from_iter([("name", "A")]);

        let updated = store.update("users", &patch, Some(&filter)).unwrap();

        assert_eq!(updated, Some(vec![person("A", 26)]));
        assert_eq!(store.read("users", Some(&filter)), Some(vec![person("A", 26)]));
        assert_eq!(store.backend().flush_count(), 1);
    }

    #[test]
    fn mutations_on_missing_collection_are_none_and_do_not_flush() {
        let store = users_store();
        let patch = Document::from_iter([("age", 1)]);

        assert_eq!(store.update("posts", &patch, None).unwrap(), None);
        assert_eq!(store.delete("posts", None).unwrap(), None);
        assert_eq!(store.backend().flush_count(), 0);
    }

    #[test]
    fn add_and_remove_collection() {
        let store = DocumentStore::new(RecordingBackend::default()).unwrap();
        assert_eq!(store.get_all_collections(), EMPTY_DATABASE_MESSAGE);

        store.add_collection("users").unwrap();
        store.add_collection("posts").unwrap();
        store.add_collection("users").unwrap();

        assert_eq!(store.get_all_collections(), "users, posts");
        assert_eq!(store.backend().flush_count(), 2);

        store.remove_collection("users").unwrap();
        store.remove_collection("users").unwrap();

        assert!(!store.does_collection_exist("users"));
        assert_eq!(store.get_all_collections(), "posts");
        assert_eq!(store.backend().flush_count(), 3);
    }

    #[test]
    fn scan_is_stable_without_mutation() {
        let store = users_store();

        assert_eq!(store.scan(), store.scan());
    }

    #[test]
    fn clones_share_state() {
        let store = users_store();
        let other = store.clone();

        other.create("users", person("D", 30)).unwrap();

        assert_eq!(store.read("users", None).map(|docs| docs.len()), Some(4));
    }

    #[test]
    fn flush_failures_propagate() {
        let backend = RecordingBackend {
            fail_flushes: true,
            ..Default::default()
        };
        let store = DocumentStore::new(backend).unwrap();

        let err = store.add_collection("users").unwrap_err();

        assert!(matches!(err, JsonDbError::Io(_)));
    }

    #[test]
    fn failed_flush_keeps_the_change_in_memory() {
        let backend = RecordingBackend {
            fail_flushes: true,
            ..Default::default()
        };
        let store = DocumentStore::new(backend).unwrap();

        assert!(store.create("posts", person("A", 1)).is_err());

        assert_eq!(store.read("posts", None), Some(vec![person("A", 1)]));
        assert_eq!(store.backend().flush_count(), 0);
    }
}
