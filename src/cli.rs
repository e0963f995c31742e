use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::Pattern;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Manifest file location
    #[arg(short, long, default_value = "hash_table.json")]
    pub manifest: PathBuf,

    /// Glob patterns to ignore (can be repeated or comma separated)
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    pub ignore: Vec<String>,

    /// One-shot operation; omit for the interactive menu
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a directory and write its hash table
    Generate {
        /// Directory to scan
        directory: PathBuf,
    },
    /// Re-scan a directory and compare it against the stored hash table
    Verify {
        /// Directory to scan
        directory: PathBuf,
    },
}

#[derive(Debug)]
pub struct Options {
    pub manifest: PathBuf,
    pub ignore_patterns: Vec<Pattern>,
}

pub fn build_options(args: &Args) -> Result<Options> {
    let patterns = args
        .ignore
        .iter()
        .map(|s| Pattern::new(s).with_context(|| format!("Invalid glob pattern: {s}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(Options {
        manifest: args.manifest.clone(),
        ignore_patterns: patterns,
    })
}
