//! Tool process runner.

use crate::command::ToolCommand;
use crate::sink::SharedSink;
use flymake_transform::TransformStream;
use std::fmt;
use std::io;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

/// Error types for the process runner.
///
/// These are setup failures; a tool reporting problems is never an error.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Failed to spawn the tool process.
    #[error("failed to spawn {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// An output channel of the process could not be acquired.
    #[error("failed to open {channel} of {tool}")]
    ChannelUnavailable { tool: String, channel: Channel },

    /// A drain task panicked or was cancelled.
    #[error("{tool} {channel} drain task failed: {message}")]
    DrainFailed {
        tool: String,
        channel: Channel,
        message: String,
    },
}

/// One of the two output channels of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdout,
    Stderr,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Stdout => "stdout",
            Channel::Stderr => "stderr",
        })
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Lines written to the sink from standard output.
    pub stdout_lines: usize,
    /// Lines written to the sink from standard error.
    pub stderr_lines: usize,
    /// Exit code of the tool, if it exited normally.
    pub exit_code: Option<i32>,
}

/// Runs one tool and streams both of its channels into a [`SharedSink`].
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    command: ToolCommand,
    sink: SharedSink,
}

impl ProcessRunner {
    /// Creates a new runner.
    pub fn new(command: ToolCommand, sink: SharedSink) -> Self {
        Self { command, sink }
    }

    /// Returns the command this runner executes.
    pub fn command(&self) -> &ToolCommand {
        &self.command
    }

    /// Runs the tool to completion.
    ///
    /// Standard output and standard error are drained concurrently: a tool
    /// filling one pipe while we block on the other would never finish.
    /// Returns once both channels reach end of stream. A nonzero exit code is
    /// reported in [`RunStats`], not as an error.
    pub async fn run(self) -> Result<RunStats, RunnerError> {
        let tool = self.command.name().to_string();
        debug!(tool = %tool, command = %self.command, dir = ?self.command.working_dir(), "starting tool");

        let mut child = self
            .command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::SpawnFailed {
                tool: tool.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunnerError::ChannelUnavailable {
                tool: tool.clone(),
                channel: Channel::Stdout,
            })?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunnerError::ChannelUnavailable {
                tool: tool.clone(),
                channel: Channel::Stderr,
            })?;

        let stdout_task = tokio::spawn(drain(
            stdout,
            self.command.stdout().stream(),
            self.sink.clone(),
            tool.clone(),
            Channel::Stdout,
        ));
        let stderr_task = tokio::spawn(drain(
            stderr,
            self.command.stderr().stream(),
            self.sink.clone(),
            tool.clone(),
            Channel::Stderr,
        ));

        let (stdout_result, stderr_result) = tokio::join!(stdout_task, stderr_task);
        let drain_failed = |channel, error: tokio::task::JoinError| RunnerError::DrainFailed {
            tool: tool.clone(),
            channel,
            message: error.to_string(),
        };
        let stdout_lines = stdout_result.map_err(|e| drain_failed(Channel::Stdout, e))?;
        let stderr_lines = stderr_result.map_err(|e| drain_failed(Channel::Stderr, e))?;

        // Both pipes are closed, so this only reaps the child.
        let exit_code = match child.wait().await {
            Ok(status) => {
                debug!(tool = %tool, %status, "tool exited");
                status.code()
            }
            Err(error) => {
                warn!(tool = %tool, %error, "failed to wait for tool");
                None
            }
        };

        Ok(RunStats {
            stdout_lines,
            stderr_lines,
            exit_code,
        })
    }
}

/// Drains one channel through its transformer, returning the lines written.
///
/// Read and write failures end the drain early; they never abort the run.
async fn drain<R>(
    reader: R,
    stream: TransformStream,
    sink: SharedSink,
    tool: String,
    channel: Channel,
) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut emitted = 0;
    if let Err(error) = pump(reader, stream, &sink, &mut emitted).await {
        warn!(tool = %tool, %channel, %error, "stopped draining channel");
    }
    debug!(tool = %tool, %channel, lines = emitted, "channel closed");
    emitted
}

async fn pump<R>(
    reader: R,
    mut stream: TransformStream,
    sink: &SharedSink,
    emitted: &mut usize,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut emit = |line: &str| -> io::Result<()> {
        sink.write_line(line)?;
        *emitted += 1;
        Ok(())
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        // Paths printed by the tools are not guaranteed to be UTF-8.
        let line = String::from_utf8_lossy(trim_line_ending(&buf));
        stream.push(&line, &mut emit)?;
    }
    stream.finish(&mut emit)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
