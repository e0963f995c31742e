// Public crate interface: re-export modules used by the binary and tests.
pub mod cli;
pub mod digest;
pub mod error;
pub mod manifest;
pub mod reconcile;
pub mod scanner;
pub mod session;

pub use cli::{build_options, Args, Options};
pub use error::{ScanError, StoreError};
pub use manifest::{FileRecord, Manifest};
pub use reconcile::{reconcile, Counters, Outcome, Report};
pub use scanner::{scan, ScanOutcome, SkippedFile};
pub use session::Session;
