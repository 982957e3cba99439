//! Main jsondb crate: an embedded, file-backed JSON document store.
//!
//! A single JSON file on disk holds named collections of flat, schema-less documents.
//! Documents are created, read, updated and deleted by exact-value equality matching, and
//! every mutation is written through to the file before the call returns.
//!
//! This crate re-exports the core types and the available backends.
//!
//! # Features
//!
//! - **Write-through persistence** - Every mutation rewrites the backing file in full
//! - **Equality filters** - Match documents on any subset of their keys
//! - **Collection handles** - Mutate a collection directly and it still persists
//! - **Pluggable backends** - JSON file on disk, or in memory for tests
//!
//! # Quick Start
//!
//! ```ignore
//! use jsondb::{prelude::*, document};
//!
//! fn main() -> JsonDbResult<()> {
//!     // ./db.json, created with `{}` if it does not exist
//!     let db = JsonFileStore::builder().open()?;
//!
//!     let created = db.create("posts", document! { "title" => "super title" })?;
//!     println!("created: {created:?}");
//!
//!     let found = db.read("posts", Some(&document! { "title" => "super title" }));
//!     println!("found: {found:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Collection Handles
//!
//! A handle obtained from [`get_collection`](store::DocumentStore::get_collection) shares the
//! store's state. Mutating it flushes the whole store, exactly like the store's own methods.
//!
//! ```ignore
//! use jsondb::{prelude::*, document};
//!
//! fn main() -> JsonDbResult<()> {
//!     let db = JsonFileStore::builder().path("./db.json").open()?;
//!     db.add_collection("posts")?;
//!
//!     let posts = db.get_collection("posts").expect("just added");
//!     posts.add(document! { "title" => "Some title", "description" => "Some description" })?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`fs`] - The JSON file backend
//! - [`memory`] - In-memory backend for tests and throwaway stores

pub mod prelude;

pub use jsondb_core::{backend, collection, document, error, persistent, store};

/// JSON file backend.
pub mod fs {
    pub use jsondb_fs::{JsonFileStore, JsonFileStoreBuilder, path::DEFAULT_FILE_NAME};
}

/// In-memory backend.
pub mod memory {
    pub use jsondb_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// A document store persisted to a JSON file.
pub type JsonDb = store::DocumentStore<jsondb_fs::JsonFileStore>;

/// Builds a [`Document`](document::Document) from `key => value` pairs.
///
/// Values may be anything convertible into a [`Value`](document::Value): string types
/// and integers.
///
/// ```ignore
/// let post = jsondb::document! { "title" => "super title", "views" => 3 };
/// assert_eq!(post.len(), 2);
/// ```
#[macro_export]
macro_rules! document {
    () => {
        $crate::document::Document::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut document = $crate::document::Document::new();
        $(
            document.insert($key, $value);
        )+
        document
    }};
}
