//! JSON file backend for jsondb.
//!
//! This crate provides a `StoreBackend` that keeps an entire store in a single UTF-8 JSON
//! file: the top-level object maps collection names to arrays of flat documents.
//!
//! ```json
//! {
//!   "posts": [
//!     {
//!       "title": "super title"
//!     }
//!   ]
//! }
//! ```
//!
//! # Behavior
//!
//! - **One read** - The file is read once, when the store is opened, and created with `{}`
//!   if it does not exist yet
//! - **Full rewrites** - Every mutation overwrites the whole file, pretty-printed with
//!   2-space indentation
//! - **Optional atomic writes** - Write to a temporary file and rename it over the target
//! - **Path resolution** - See [`path`] for how the target file is chosen
//!
//! # Example
//!
//! ```ignore
//! use jsondb_fs::JsonFileStore;
//! use jsondb_core::document::Document;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonFileStore::builder()
//!         .path("./db.json")
//!         .open()?;
//!
//!     store.create("posts", Document::from_iter([("title", "super title")]))?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as jsondb_fs;

pub mod path;
pub mod store;

pub use store::{JsonFileStore, JsonFileStoreBuilder};
