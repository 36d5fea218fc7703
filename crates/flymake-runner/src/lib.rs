//! Concurrent process runner for flymake tools.
//!
//! Each [`ProcessRunner`] owns one tool process, drains its standard output and
//! standard error in two tokio tasks, and passes every line through the
//! [`LineTransformer`](flymake_transform::LineTransformer) bound to that
//! channel. All transformed lines end up in one [`SharedSink`], which keeps
//! each line whole no matter how many runners write at once.
//!
//! # Example
//!
//! ```ignore
//! use flymake_runner::{ProcessRunner, SharedSink, ToolCommand};
//! use flymake_transform::LineTransformer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let command = ToolCommand::new("vet", "go")
//!         .args(["vet", "main.go"])
//!         .stderr_transformer(LineTransformer::SeverityAnnotate);
//!
//!     let stats = ProcessRunner::new(command, SharedSink::stdout())
//!         .run()
//!         .await
//!         .unwrap();
//!     eprintln!("vet exited with {:?}", stats.exit_code);
//! }
//! ```

mod command;
mod runner;
mod sink;

pub use command::ToolCommand;
pub use runner::{Channel, ProcessRunner, RunStats, RunnerError};
pub use sink::{CapturedOutput, SharedSink};
