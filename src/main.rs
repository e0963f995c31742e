use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use intact::cli::{build_options, Args, Command};
use intact::session::Session;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = build_options(&args)?;
    let session = Session::new(options);

    match args.command {
        Some(Command::Generate { directory }) => session.generate(&directory),
        Some(Command::Verify { directory }) => session.verify(&directory),
        None => session.run(),
    }
}
