//! Convenient re-exports of commonly used types from jsondb.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use jsondb::prelude::*;
//! ```

pub use jsondb_core::{
    backend::{Collections, StoreBackend, StoreBackendBuilder},
    collection::Collection,
    document::{Document, Filter, Value},
    error::{JsonDbError, JsonDbResult},
    persistent::PersistentCollection,
    store::DocumentStore,
};
pub use jsondb_fs::{JsonFileStore, JsonFileStoreBuilder};
pub use jsondb_memory::{InMemoryStore, InMemoryStoreBuilder};

pub use crate::JsonDb;
