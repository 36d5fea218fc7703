//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;

/// Flymake diagnostics for a single Go source file.
#[derive(Debug, Parser)]
#[command(name = "goflymake-rs")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    GOFLYMAKE_DEBUG=1    Same as --debug\n    RUST_LOG=debug       Fine-grained log filter")]
pub struct Args {
    /// Go source file to check
    pub file: Utf8PathBuf,

    /// The prefix for generated flymake artifacts
    #[arg(long, default_value = "flymake_")]
    pub prefix: String,

    /// Enable extra diagnostic output to determine why errors are occurring
    #[arg(long)]
    pub debug: bool,

    /// Stop waiting for the tools after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}
