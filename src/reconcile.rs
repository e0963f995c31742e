//! Reconciliation of a stored manifest against a fresh scan.
//!
//! Pure classification over two in-memory manifests; no filesystem access.
//! Every stored path ends up in exactly one of Unchanged, Modified, Renamed
//! or Deleted, and every current path not matched by that pass is Added.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::manifest::Manifest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unchanged(String),
    Modified(String),
    Deleted(String),
    Renamed { from: String, to: String },
    Added(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Unchanged(path) => write!(f, "{path} hash is valid."),
            Outcome::Modified(path) => write!(f, "{path} hash is invalid."),
            Outcome::Added(path) => write!(f, "File added: {path}"),
            Outcome::Deleted(path) => write!(f, "File deleted: {path}"),
            Outcome::Renamed { from, to } => write!(
                f,
                "File name change detected, {} has been renamed to {}.",
                basename(from),
                basename(to)
            ),
        }
    }
}

// Manifest paths always use forward slashes.
fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub unchanged: usize,
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
    pub renamed: usize,
}

#[derive(Debug, Default)]
pub struct Report {
    outcomes: Vec<Outcome>,
}

impl Report {
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn counters(&self) -> Counters {
        let mut c = Counters::default();
        for outcome in &self.outcomes {
            match outcome {
                Outcome::Unchanged(_) => c.unchanged += 1,
                Outcome::Modified(_) => c.modified += 1,
                Outcome::Added(_) => c.added += 1,
                Outcome::Deleted(_) => c.deleted += 1,
                Outcome::Renamed { .. } => c.renamed += 1,
            }
        }
        c
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
        }
        Ok(())
    }
}

/// Classifies every path across the two manifests.
///
/// Stored entries are visited in stored order: a path present in `current`
/// is Unchanged or Modified by digest comparison; an absent path whose
/// digest still exists under some current path is Renamed, otherwise
/// Deleted. Current paths left unmatched are Added, in current order.
///
/// Rename targets must be paths that are new in `current` (a current path
/// that also exists in `stored` is classified on its own and is never a
/// rename destination). When several candidates share the digest the
/// lexicographically smallest unconsumed one wins, and each current path
/// can be the target of at most one rename.
pub fn reconcile(stored: &Manifest, current: &Manifest) -> Report {
    // digest -> current paths, in current insertion order
    let mut digest_index: HashMap<&str, Vec<&str>> = HashMap::new();
    for record in current.records() {
        digest_index
            .entry(record.hash.as_str())
            .or_default()
            .push(record.filepath.as_str());
    }

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut outcomes = Vec::with_capacity(stored.len() + current.len());

    for record in stored.records() {
        let path = record.filepath.as_str();
        match current.digest_for(path) {
            Some(digest) if digest == record.hash => {
                consumed.insert(path);
                outcomes.push(Outcome::Unchanged(record.filepath.clone()));
            }
            Some(_) => {
                consumed.insert(path);
                outcomes.push(Outcome::Modified(record.filepath.clone()));
            }
            None => {
                let target = digest_index
                    .get(record.hash.as_str())
                    .into_iter()
                    .flatten()
                    .filter(|p| !stored.contains_path(p) && !consumed.contains(**p))
                    .min()
                    .copied();
                match target {
                    Some(to) => {
                        consumed.insert(to);
                        outcomes.push(Outcome::Renamed {
                            from: record.filepath.clone(),
                            to: to.to_string(),
                        });
                    }
                    None => outcomes.push(Outcome::Deleted(record.filepath.clone())),
                }
            }
        }
    }

    for record in current.records() {
        if !consumed.contains(record.filepath.as_str()) {
            outcomes.push(Outcome::Added(record.filepath.clone()));
        }
    }

    Report { outcomes }
}
