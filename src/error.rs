//! Error types for scanning and manifest persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Scan-level errors. Per-file read failures are not errors; the scanner
/// collects them as skipped entries and keeps going.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("directory '{}' does not exist or is not a directory", .0.display())]
    DirectoryNotFound(PathBuf),
}

/// Manifest store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no manifest found at '{}' (generate a hash table first)", .0.display())]
    NotFound(PathBuf),

    #[error("manifest '{}' is corrupt and cannot be parsed: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write manifest '{}': {source}", .path.display())]
    Persistence { path: PathBuf, source: io::Error },

    #[error("failed to read manifest '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}
