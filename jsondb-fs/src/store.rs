//! The JSON file backend.
//!
//! [`JsonFileStore`] keeps the whole store in one file and is built through
//! [`JsonFileStoreBuilder`], which resolves and validates the path first.

use log::{debug, info};
use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use jsondb_core::{
    backend::{Collections, StoreBackend, StoreBackendBuilder, collections_from_json, collections_to_json},
    error::{JsonDbError, JsonDbResult},
    store::DocumentStore,
};

use crate::path::resolve;

/// A backend that persists the whole store as one pretty-printed JSON file.
///
/// The file is read once, in [`load`](StoreBackend::load), and overwritten in full on every
/// flush. There is no cross-process locking; two stores pointed at the same file will
/// overwrite each other's flushes.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    atomic_writes: bool,
}

impl JsonFileStore {
    /// Returns a builder. Backends are only constructed through it, so every path is
    /// validated by [`resolve`] before anything touches the disk.
    pub fn builder() -> JsonFileStoreBuilder {
        JsonFileStoreBuilder::default()
    }

    /// Returns the resolved backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> JsonDbResult<()> {
        if self.atomic_writes {
            return self.write_atomic(contents);
        }

        fs::write(&self.path, contents)?;

        Ok(())
    }

    // temp + fsync + rename, so a crash leaves either the old or the new file
    fn write_atomic(&self, contents: &str) -> JsonDbResult<()> {
        let tmp_path = self.path.with_extension("json.tmp");

        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }
}

impl StoreBackend for JsonFileStore {
    fn load(&self) -> JsonDbResult<Collections> {
        if !self.path.exists() {
            let collections = Collections::new();
            self.write(&collections_to_json(&collections)?)?;

            info!("Created database file {}", self.path.display());

            return Ok(collections);
        }

        let contents = fs::read(&self.path)?;

        let value = serde_json::from_slice(&contents).map_err(|e| JsonDbError::InvalidJson {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        collections_from_json(value).map_err(|reason| JsonDbError::InvalidJson {
            path: self.path.clone(),
            reason,
        })
    }

    fn flush(&self, collections: &Collections) -> JsonDbResult<()> {
        let contents = collections_to_json(collections)?;
        self.write(&contents)?;

        debug!("Wrote {} bytes to {}", contents.len(), self.path.display());

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Configuration for a [`JsonFileStore`].
///
/// # Example
///
/// ```ignore
/// use jsondb_fs::JsonFileStore;
///
/// // ./data/db.json, relative to the process working directory
/// let store = JsonFileStore::builder()
///     .path("data")
///     .open()?;
/// ```
#[derive(Debug, Default)]
pub struct JsonFileStoreBuilder {
    path: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    atomic_writes: bool,
}

impl JsonFileStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target file or directory. Omitted means `db.json` in the working directory.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());

        self
    }

    /// Sets the base directory for relative paths and for the default file.
    ///
    /// Defaults to the process's current working directory.
    pub fn working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(working_dir.into());

        self
    }

    /// Writes through a temporary file and renames it over the target on every flush.
    pub fn atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;

        self
    }

    /// Builds the backend and opens a store over it, loading or creating the file.
    pub fn open(self) -> JsonDbResult<DocumentStore<JsonFileStore>> {
        DocumentStore::open(self)
    }
}

impl StoreBackendBuilder for JsonFileStoreBuilder {
    type Backend = JsonFileStore;

    /// Resolves and validates the path. The file itself is not touched.
    fn build(self) -> JsonDbResult<Self::Backend> {
        let working_dir = match self.working_dir {
            Some(dir) => dir,
            None => env::current_dir()?,
        };

        let path = resolve(self.path.as_deref(), &working_dir)?;

        debug!("Resolved database file {}", path.display());

        Ok(JsonFileStore {
            path,
            atomic_writes: self.atomic_writes,
        })
    }
}
