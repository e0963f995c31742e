//! Interactive session driving the scanner, store and reconciler.

use std::path::{Path, PathBuf};

use anyhow::Result;
use dialoguer::Input;
use glob::Pattern;
use tracing::debug;

use crate::cli::Options;
use crate::error::ScanError;
use crate::manifest::{self, Manifest};
use crate::reconcile::reconcile;
use crate::scanner::{scan, ScanOutcome, SkippedFile};

/// One interactive session. Holds the resolved options; each menu choice is
/// a self-contained operation with no state carried between them.
pub struct Session {
    manifest_path: PathBuf,
    ignore_patterns: Vec<Pattern>,
}

impl Session {
    pub fn new(options: Options) -> Self {
        Self {
            manifest_path: options.manifest,
            ignore_patterns: options.ignore_patterns,
        }
    }

    /// Menu loop: generate, verify, exit. Invalid input re-prompts; errors
    /// from either operation are printed and the menu continues.
    pub fn run(&self) -> Result<()> {
        println!("intact - directory integrity checker");
        loop {
            println!();
            println!("Please select an option:");
            println!("1. Generate a new hash table");
            println!("2. Verify hashes");
            println!("3. Exit");

            let choice: String = Input::new()
                .with_prompt("Enter your choice (1, 2, or 3)")
                .interact_text()?;

            match choice.trim() {
                "1" => {
                    let dir = prompt_directory("generate the hash table")?;
                    if let Err(err) = self.generate(&dir) {
                        println!("{err:#}");
                    }
                }
                "2" => {
                    let dir = prompt_directory("verify the hashes")?;
                    if let Err(err) = self.verify(&dir) {
                        println!("{err:#}");
                    }
                }
                "3" => {
                    println!("Exiting.");
                    return Ok(());
                }
                _ => println!("Invalid choice. Please enter 1, 2, or 3."),
            }
        }
    }

    /// Scans `dir` and writes the manifest. Does not claim success unless
    /// the manifest actually reached disk.
    pub fn generate(&self, dir: &Path) -> Result<()> {
        let outcome = self.scan_or_empty(dir);
        report_skipped(&outcome.skipped);
        outcome.manifest.save(&self.manifest_path)?;
        debug!(
            files = outcome.manifest.len(),
            manifest = %self.manifest_path.display(),
            "manifest written"
        );
        println!("Hash table generated.");
        Ok(())
    }

    /// Loads the stored manifest, re-scans `dir` and prints one report line
    /// per classified path, followed by a summary.
    pub fn verify(&self, dir: &Path) -> Result<()> {
        let stored = Manifest::load(&self.manifest_path)?;
        let outcome = self.scan_or_empty(dir);
        report_skipped(&outcome.skipped);

        let report = reconcile(&stored, &outcome.manifest);
        print!("{report}");

        let c = report.counters();
        println!(
            "{} valid, {} invalid, {} added, {} deleted, {} renamed.",
            c.unchanged, c.modified, c.added, c.deleted, c.renamed
        );
        Ok(())
    }

    // A vanished scan root is a soft condition: warn and carry on with an
    // empty manifest, matching the generate/verify contract.
    fn scan_or_empty(&self, dir: &Path) -> ScanOutcome {
        match scan(dir, &self.ignore_patterns, &self.exclusions()) {
            Ok(outcome) => outcome,
            Err(ScanError::DirectoryNotFound(path)) => {
                println!("Directory '{}' does not exist.", path.display());
                ScanOutcome::default()
            }
        }
    }

    // The manifest and its save-time temp file never belong in a scan.
    fn exclusions(&self) -> Vec<PathBuf> {
        vec![
            self.manifest_path.clone(),
            manifest::tmp_path(&self.manifest_path),
        ]
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }
}

fn prompt_directory(action: &str) -> Result<PathBuf> {
    let dir: String = Input::new()
        .with_prompt(format!("Enter the directory path to {action}"))
        .interact_text()?;
    Ok(PathBuf::from(dir.trim()))
}

fn report_skipped(skipped: &[SkippedFile]) {
    if skipped.is_empty() {
        return;
    }
    println!("Warning: {} file(s) could not be read and were skipped:", skipped.len());
    for skip in skipped {
        println!("  {}: {}", skip.path.display(), skip.error);
    }
}
