//! Write-through collection handles.
//!
//! A [`PersistentCollection`] wraps one named collection of a
//! [`DocumentStore`](crate::store::DocumentStore). Non-mutating calls pass straight through
//! to the in-memory [`Collection`](crate::collection::Collection). Mutating calls run the
//! wrapped operation and then flush the store's *full* current state, under a single lock,
//! before returning the wrapped result. A caller that mutates a handle directly therefore
//! never needs to save anything explicitly.
//!
//! A handle outlives the collection it names: once the collection is removed from the store
//! the handle is detached. Reads on a detached handle see an empty collection, and mutations
//! fail with [`JsonDbError::CollectionNotFound`] without writing anything.

use std::{fmt, sync::Arc};

use crate::{
    backend::StoreBackend,
    collection::Collection,
    document::{Document, Filter},
    error::{JsonDbError, JsonDbResult},
    store::StoreState,
};

/// A handle to one collection that persists every mutation.
pub struct PersistentCollection<B: StoreBackend> {
    name: String,
    state: Arc<StoreState<B>>,
}

impl<B: StoreBackend> PersistentCollection<B> {
    pub(crate) fn new(name: String, state: Arc<StoreState<B>>) -> Self {
        Self { name, state }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `false` once the collection has been removed from the store.
    pub fn exists(&self) -> bool {
        self.state
            .inspect(&self.name, |_| ())
            .is_some()
    }

    /// Returns the documents matching `filter`; `None` matches everything.
    pub fn read(&self, filter: Option<&Filter>) -> Vec<Document> {
        self.state
            .inspect(&self.name, |collection| collection.read(filter))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.state
            .inspect(&self.name, |collection| collection.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `document` and flushes. Returns the inserted document.
    ///
    /// # Errors
    ///
    /// Returns [`JsonDbError::CollectionNotFound`] if the handle is detached, or the
    /// backend's error if the flush fails.
    pub fn add(&self, document: Document) -> JsonDbResult<Document> {
        let inserted = document.clone();

        self.write(move |collection| {
            collection.add(document);
        })?;

        Ok(inserted)
    }

    /// Merges `patch` into every document matching `filter` and flushes.
    ///
    /// Returns the updated documents; an empty vector if nothing matched.
    pub fn update(&self, patch: &Document, filter: Option<&Filter>) -> JsonDbResult<Vec<Document>> {
        self.write(|collection| collection.update(patch, filter))
    }

    /// Removes every document matching `filter` and flushes.
    ///
    /// Returns the removed documents in their original order.
    pub fn delete(&self, filter: Option<&Filter>) -> JsonDbResult<Vec<Document>> {
        self.write(|collection| collection.delete(filter))
    }

    fn write<T>(&self, op: impl FnOnce(&mut Collection) -> T) -> JsonDbResult<T> {
        self.state
            .mutate(&self.name, false, op)?
            .ok_or_else(|| JsonDbError::CollectionNotFound(self.name.clone()))
    }
}

impl<B: StoreBackend> Clone for PersistentCollection<B> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: StoreBackend> fmt::Debug for PersistentCollection<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentCollection")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::Collections,
        store::{DocumentStore, tests::RecordingBackend},
    };

    fn post(title: &str) -> Document {
        Document::from_iter([("title", title)])
    }

    fn posts_store() -> DocumentStore<RecordingBackend> {
        let store = DocumentStore::new(RecordingBackend::default()).unwrap();
        store.add_collection("posts").unwrap();

        store
    }

    #[test]
    fn add_through_handle_flushes_full_state() {
        let store = posts_store();
        store.add_collection("users").unwrap();
        let posts = store.get_collection("posts").unwrap();

        let inserted = posts.add(post("Some title")).unwrap();

        assert_eq!(inserted, post("Some title"));
        assert_eq!(posts.read(None), vec![post("Some title")]);

        let flushed = store.backend().last_flush().unwrap();
        assert_eq!(flushed, store.scan());
        assert!(flushed.contains_key("users"));
    }

    #[test]
    fn reads_do_not_flush() {
        let store = posts_store();
        let posts = store.get_collection("posts").unwrap();
        let before = store.backend().flush_count();

        posts.read(None);
        posts.read(Some(&post("x")));
        assert!(posts.is_empty());

        assert_eq!(store.backend().flush_count(), before);
    }

    #[test]
    fn update_and_delete_through_handle() {
        let store = posts_store();
        let posts = store.get_collection("posts").unwrap();
        posts.add(post("a")).unwrap();
        posts.add(post("b")).unwrap();

        let patch = Document::from_iter([("title", "c")]);
        assert_eq!(posts.update(&patch, Some(&post("a"))).unwrap(), vec![post("c")]);
        assert_eq!(posts.delete(Some(&post("b"))).unwrap(), vec![post("b")]);

        assert_eq!(store.read("posts", None), Some(vec![post("c")]));
        assert_eq!(store.backend().last_flush().unwrap(), store.scan());
    }

    #[test]
    fn detached_handle_refuses_writes() {
        let store = posts_store();
        let posts = store.get_collection("posts").unwrap();
        store.remove_collection("posts").unwrap();
        let flushes = store.backend().flush_count();

        assert!(!posts.exists());
        assert!(posts.read(None).is_empty());
        assert!(matches!(
            posts.add(post("late")),
            Err(JsonDbError::CollectionNotFound(name)) if name == "posts"
        ));
        assert_eq!(store.backend().flush_count(), flushes);
        assert_eq!(store.scan(), Collections::new());
    }
}
