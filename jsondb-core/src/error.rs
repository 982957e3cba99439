//! Error types and result types for document store operations.
//!
//! Construction-time failures (bad path, bad file type, malformed file content) and
//! I/O failures are reported through [`JsonDbError`]. Looking up a collection that does
//! not exist is *not* an error on the store's read paths; those return `None` instead.
//! Use [`JsonDbResult<T>`] as the return type for fallible operations.

use std::{io, path::PathBuf};
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum JsonDbError {
    /// The backing file does not contain a valid database.
    ///
    /// Raised while loading when the content is not parseable JSON, or when it parses
    /// but is not an object of arrays of flat documents.
    #[error("Invalid JSON in {}: {reason}", path.display())]
    InvalidJson {
        /// The file that failed to load.
        path: PathBuf,
        /// What the parser rejected.
        reason: String,
    },
    /// The given path has a file extension other than `.json`.
    #[error("Invalid file type: {} is not a .json file", .0.display())]
    InvalidFileType(PathBuf),
    /// The given path names a directory that does not exist.
    #[error("Invalid path: directory {} does not exist", .0.display())]
    InvalidPath(PathBuf),
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Serialization error when converting the in-memory state to JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A detached collection handle was mutated after its collection was removed.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// A value could not be turned into a flat document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// A specialized `Result` type for document store operations.
pub type JsonDbResult<T> = Result<T, JsonDbError>;

impl From<SerdeJsonError> for JsonDbError {
    fn from(err: SerdeJsonError) -> Self {
        JsonDbError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_json_names_the_path() {
        let err = JsonDbError::InvalidJson {
            path: PathBuf::from("/tmp/broken.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Invalid JSON in /tmp/broken.json: expected value at line 1 column 1"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: JsonDbError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();

        assert!(matches!(err, JsonDbError::Io(ref inner) if inner.kind() == io::ErrorKind::PermissionDenied));
    }
}
