//! Main orchestration logic.

use crate::commands::tool_commands;
use crate::config::Config;
use crate::package::DirectoryLookup;
use flymake_runner::{ProcessRunner, RunStats, RunnerError, SharedSink, ToolCommand};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Orchestration errors. All of them abort the run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A tool could not be started.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// A runner task panicked.
    #[error("runner task failed: {0}")]
    TaskFailed(String),
}

/// Summary of a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of tools that ran to completion.
    pub completed: usize,
    /// Number of diagnostic lines written.
    pub line_count: usize,
    /// Whether the deadline expired before every tool finished.
    pub timed_out: bool,
}

impl RunSummary {
    fn record(&mut self, stats: &RunStats) {
        self.completed += 1;
        self.line_count += stats.stdout_lines + stats.stderr_lines;
    }
}

/// Runs every tool for the configured file, writing to standard output.
pub async fn run(config: &Config) -> Result<RunSummary, OrchestratorError> {
    let commands = tool_commands(config, &DirectoryLookup);
    run_commands(commands, SharedSink::stdout(), config.timeout).await
}

/// Runs all commands concurrently and waits for every one of them.
///
/// The first setup failure aborts the remaining runners. When `timeout`
/// expires the outstanding runners are cancelled, which kills their tools.
pub async fn run_commands(
    commands: Vec<ToolCommand>,
    sink: SharedSink,
    timeout: Option<Duration>,
) -> Result<RunSummary, OrchestratorError> {
    let mut runners = JoinSet::new();
    for command in commands {
        runners.spawn(ProcessRunner::new(command, sink.clone()).run());
    }

    let mut summary = RunSummary::default();
    match timeout {
        None => wait_all(&mut runners, &mut summary).await?,
        Some(limit) => {
            let outcome = tokio::time::timeout(limit, wait_all(&mut runners, &mut summary)).await;
            match outcome {
                Ok(result) => result?,
                Err(_) => {
                    warn!(
                        timeout = ?limit,
                        pending = runners.len(),
                        "deadline expired, cancelling remaining tools"
                    );
                    runners.shutdown().await;
                    summary.timed_out = true;
                }
            }
        }
    }

    debug!(?summary, "all tools finished");
    Ok(summary)
}

async fn wait_all(
    runners: &mut JoinSet<Result<RunStats, RunnerError>>,
    summary: &mut RunSummary,
) -> Result<(), OrchestratorError> {
    while let Some(joined) = runners.join_next().await {
        let stats = joined.map_err(|e| OrchestratorError::TaskFailed(e.to_string()))??;
        summary.record(&stats);
    }
    Ok(())
}
