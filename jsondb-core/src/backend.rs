//! Persistence backend abstraction for the document store.
//!
//! This module defines the seam between the in-memory collections owned by a
//! [`DocumentStore`](crate::store::DocumentStore) and wherever that state is persisted.
//!
//! # Overview
//!
//! A [`StoreBackend`] has exactly two duties:
//!
//! - **Load** the full set of collections once, when the store is constructed. A backend
//!   that has nothing to load yet (e.g. a missing file) creates its empty representation.
//! - **Flush** the full set of collections after every mutation. A flush always writes the
//!   complete state; there are no appends or partial writes.
//!
//! All calls are synchronous and block until the underlying I/O completes.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for persistence backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use jsondb_core::backend::StoreBackend;
//!
//! let backend = MyBackendImpl::new();
//! let collections = backend.load()?;
//! backend.flush(&collections)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt::Debug;

use crate::{
    collection::Collection,
    document::{Document, json_kind},
    error::{JsonDbError, JsonDbResult},
};

/// The full in-memory state of a store: collection name to collection.
///
/// Collection names keep their insertion order, which is the order they appear in the
/// backing file.
pub type Collections = IndexMap<String, Collection>;

/// Abstract interface for persistence backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The store serializes all calls to
/// [`flush`](StoreBackend::flush) under its own lock, so a backend never sees two
/// concurrent flushes from the same store.
///
/// # Error Handling
///
/// I/O failures are reported as [`JsonDbError::Io`] and are neither retried nor recovered.
pub trait StoreBackend: Send + Sync + Debug {
    /// Loads the persisted collections.
    ///
    /// Called exactly once, by the store constructor. If nothing has been persisted yet,
    /// the backend creates its empty representation and returns an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`JsonDbError::InvalidJson`] if the persisted content is malformed, or
    /// [`JsonDbError::Io`] if it cannot be read or created.
    fn load(&self) -> JsonDbResult<Collections>;

    /// Overwrites the persisted state with `collections`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    fn flush(&self, collections: &Collections) -> JsonDbResult<()>;

    /// A human-readable description of where the state lives, used in log messages.
    fn location(&self) -> String;
}

/// Factory trait for constructing backend instances.
///
/// Builders carry a backend's configuration and validate it in
/// [`build`](StoreBackendBuilder::build), before any data is touched.
pub trait StoreBackendBuilder {
    /// The type of backend this builder creates.
    type Backend: StoreBackend;

    /// Validates the configuration and builds the backend.
    fn build(self) -> JsonDbResult<Self::Backend>;
}

/// Converts a parsed JSON value into collections.
///
/// The top level must be an object, each member an array, and each array element a flat
/// object of strings and numbers. The error string describes the first violation.
pub fn collections_from_json(value: JsonValue) -> Result<Collections, String> {
    let map = match value {
        JsonValue::Object(map) => map,
        other => return Err(format!("expected an object at the top level, found {}", json_kind(&other))),
    };

    let mut collections = Collections::with_capacity(map.len());

    for (name, documents) in map {
        let documents = match documents {
            JsonValue::Array(documents) => documents,
            other => return Err(format!("collection {name:?} must be an array, found {}", json_kind(&other))),
        };

        let collection = documents
            .into_iter()
            .enumerate()
            .map(|(index, document)| {
                Document::try_from(document)
                    .map_err(|e| format!("collection {name:?}, document {index}: {e}"))
            })
            .collect::<Result<Collection, String>>()?;

        collections.insert(name, collection);
    }

    Ok(collections)
}

/// Serializes collections as pretty-printed JSON (2-space indentation).
///
/// An empty map serializes as `{}`.
pub fn collections_to_json(collections: &Collections) -> JsonDbResult<String> {
    serde_json::to_string_pretty(collections).map_err(JsonDbError::from)
}
