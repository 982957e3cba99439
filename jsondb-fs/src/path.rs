//! Resolution of the backing file path.
//!
//! Rules, evaluated once when the backend is built:
//!
//! - No path, or an empty path: `<working_dir>/db.json`.
//! - A path with a `.json` extension (any ASCII case): that exact file.
//! - A path with any other extension: [`JsonDbError::InvalidFileType`].
//! - A path without an extension names a directory. If the directory does not exist the
//!   result is [`JsonDbError::InvalidPath`]; otherwise the target is `db.json` inside it.
//!
//! Relative paths are joined onto the working directory. Nothing is created here.

use std::path::{Path, PathBuf};

use jsondb_core::error::{JsonDbError, JsonDbResult};

/// File name used when the path is omitted or names a directory.
pub const DEFAULT_FILE_NAME: &str = "db.json";

const JSON_EXTENSION: &str = "json";

/// Resolves `path` against `working_dir` into the backing file location.
pub fn resolve(path: Option<&Path>, working_dir: &Path) -> JsonDbResult<PathBuf> {
    let path = match path {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => return Ok(working_dir.join(DEFAULT_FILE_NAME)),
    };

    let full = if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    };

    match full.extension() {
        Some(extension) if extension.eq_ignore_ascii_case(JSON_EXTENSION) => Ok(full),
        Some(_) => Err(JsonDbError::InvalidFileType(full)),
        None if full.is_dir() => Ok(full.join(DEFAULT_FILE_NAME)),
        None => Err(JsonDbError::InvalidPath(full)),
    }
}
