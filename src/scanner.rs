use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::digest::digest_file;
use crate::error::ScanError;
use crate::manifest::{FileRecord, Manifest};

/// A file the scanner could not read. Surfaced to the caller so an
/// unreadable file is never mistaken for a deleted one.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: io::Error,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub manifest: Manifest,
    pub skipped: Vec<SkippedFile>,
}

fn is_ignored(rel: &Path, patterns: &[Pattern]) -> bool {
    let name = rel.file_name().and_then(|s| s.to_str()).unwrap_or("");
    if [".git", "__pycache__", ".DS_Store", "Thumbs.db"].contains(&name) {
        return true;
    }
    let s_rel = rel.to_string_lossy().replace('\\', "/"); // Glob uses forward slash
    for pat in patterns {
        if pat.matches(&s_rel) || pat.matches(name) {
            return true;
        }
    }
    false
}

/// Walks `root` and digests every regular file into a manifest.
///
/// Traversal is sorted per directory level, so the resulting record order
/// is reproducible across runs. Paths are recorded relative to `root` with
/// forward slashes. Files that cannot be read are collected in
/// `ScanOutcome::skipped` and the walk continues. `exclude` holds paths to
/// leave out of the manifest entirely (the manifest file itself, when it
/// lives inside the scanned tree).
pub fn scan(
    root: &Path,
    patterns: &[Pattern],
    exclude: &[PathBuf],
) -> Result<ScanOutcome, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }

    let excluded: Vec<PathBuf> = exclude.iter().filter_map(|p| p.canonicalize().ok()).collect();

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(|e| {
        let path = e.path();
        if let Ok(rel) = path.strip_prefix(root) {
            if rel == Path::new("") {
                return true;
            }
            !is_ignored(rel, patterns)
        } else {
            true
        }
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // Unreadable directory entries are skipped, not fatal.
                let path = err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                let error = err.into_io_error().unwrap_or_else(|| {
                    io::Error::new(io::ErrorKind::Other, "directory walk error")
                });
                warn!(path = %path.display(), %error, "skipping unreadable entry");
                skipped.push(SkippedFile { path, error });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        if !excluded.is_empty() {
            if let Ok(abs) = path.canonicalize() {
                if excluded.contains(&abs) {
                    continue;
                }
            }
        }

        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };

        match digest_file(path) {
            Ok(hash) => {
                let filepath = rel.to_string_lossy().replace('\\', "/");
                records.push(FileRecord::new(filepath, hash));
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping unreadable file");
                skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
    }

    debug!(
        files = records.len(),
        skipped = skipped.len(),
        root = %root.display(),
        "scan complete"
    );

    Ok(ScanOutcome {
        manifest: Manifest::from_records(records),
        skipped,
    })
}
