//! goflymake-rs: flymake diagnostics for Go.

mod cli;
mod commands;
mod config;
mod orchestrator;
mod package;

use clap::Parser;
use cli::Args;
use config::Config;
use miette::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args);
    init_logging(config.debug);

    debug!(args = ?std::env::args().collect::<Vec<_>>(), "arguments");
    for name in ["PATH", "GOPATH", "GOROOT"] {
        debug!("{name}={}", std::env::var(name).unwrap_or_default());
    }
    debug!(go = %config.tools.go, gofmt = %config.tools.gofmt, "tools");

    match orchestrator::run(&config).await {
        Ok(summary) => {
            debug!(
                completed = summary.completed,
                lines = summary.line_count,
                timed_out = summary.timed_out,
                "done"
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr; stdout carries only diagnostics.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
