//! Core types for an embedded, file-backed JSON document store.
//!
//! This crate is the core of the jsondb project and provides:
//!
//! - **Documents** ([`document`]) - Flat key/value documents of strings and numbers
//! - **Collections** ([`collection`]) - Ordered, in-memory sequences of documents
//! - **Persistence backends** ([`backend`]) - The load/flush seam every backend implements
//! - **Write-through handles** ([`persistent`]) - Collection handles that flush on mutation
//! - **Document store** ([`store`]) - The collection-oriented CRUD facade
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use jsondb_core::{document::Document, store::DocumentStore};
//!
//! let store = DocumentStore::new(backend)?;
//!
//! store.create("posts", Document::from_iter([("title", "super title")]))?;
//!
//! let posts = store.get_collection("posts").unwrap();
//! posts.add(Document::from_iter([("title", "another title")]))?;
//!
//! assert_eq!(posts.len(), 2);
//! ```

#[allow(unused_extern_crates)]
extern crate self as jsondb_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod persistent;
pub mod store;
