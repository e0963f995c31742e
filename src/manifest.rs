//! The persisted path -> digest snapshot and its JSON store.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// One scanned file: root-relative path (forward slashes) and its digest.
/// Field names are the on-disk manifest format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRecord {
    pub filepath: String,
    pub hash: String,
}

impl FileRecord {
    pub fn new(filepath: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            hash: hash.into(),
        }
    }
}

/// An ordered set of records with unique paths. Built once, then queried;
/// records are never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    records: Vec<FileRecord>,
    by_path: HashMap<String, usize>,
}

impl Manifest {
    /// Collapses a record sequence into a manifest. Paths are unique;
    /// a duplicate path keeps its original position but takes the later
    /// digest (last write wins).
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        let mut manifest = Self::default();
        for record in records {
            match manifest.by_path.get(&record.filepath) {
                Some(&idx) => manifest.records[idx].hash = record.hash,
                None => {
                    manifest
                        .by_path
                        .insert(record.filepath.clone(), manifest.records.len());
                    manifest.records.push(record);
                }
            }
        }
        manifest
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn digest_for(&self, path: &str) -> Option<&str> {
        self.by_path
            .get(path)
            .map(|&idx| self.records[idx].hash.as_str())
    }

    /// Writes the manifest as pretty-printed JSON. Goes through a sibling
    /// temporary file and an atomic rename so a failed write is never
    /// half-read as a valid manifest later.
    pub fn save(&self, location: &Path) -> Result<(), StoreError> {
        let persistence = |source: io::Error| StoreError::Persistence {
            path: location.to_path_buf(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.records)
            .map_err(|e| persistence(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp = tmp_path(location);
        fs::write(&tmp, json).map_err(persistence)?;
        fs::rename(&tmp, location).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            persistence(e)
        })
    }

    /// Reads a manifest back. A missing file and an unparsable file are
    /// distinct conditions; callers handle them differently.
    pub fn load(location: &Path) -> Result<Self, StoreError> {
        let bytes = match fs::read(location) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(location.to_path_buf()));
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: location.to_path_buf(),
                    source: e,
                });
            }
        };

        let records: Vec<FileRecord> =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                path: location.to_path_buf(),
                source: e,
            })?;

        Ok(Self::from_records(records))
    }
}

/// Equality is the path -> digest mapping; record order is a serialization
/// guarantee, not part of equality.
impl PartialEq for Manifest {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .records
                .iter()
                .all(|r| other.digest_for(&r.filepath) == Some(r.hash.as_str()))
    }
}

impl Eq for Manifest {}

/// Sibling temp file used during saves; the scanner excludes it too.
pub(crate) fn tmp_path(location: &Path) -> PathBuf {
    let mut name = location
        .file_name()
        .map_or_else(|| OsString::from("manifest"), OsString::from);
    name.push(".tmp");
    location.with_file_name(name)
}
