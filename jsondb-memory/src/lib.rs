//! In-memory persistence backend for jsondb.
//!
//! This crate provides an implementation of the `StoreBackend` trait that keeps every
//! flushed state in memory. It behaves exactly like the file backend from the store's
//! point of view (one load, one full flush per mutation), which makes it ideal for tests
//! and for throwaway stores.
//!
//! # Features
//!
//! - **Thread-safe access** - Snapshot guarded by a mutex, shareable through clones
//! - **Observable flushes** - Inspect the last flushed state and the flush count
//! - **Seeding** - Start from pre-populated collections via the builder
//!
//! # Quick Start
//!
//! ```ignore
//! use jsondb::{prelude::*, memory::InMemoryStore};
//!
//! fn main() -> JsonDbResult<()> {
//!     let store = DocumentStore::open(InMemoryStore::builder())?;
//!
//!     store.create("posts", document! { "title" => "super title" })?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as jsondb_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
