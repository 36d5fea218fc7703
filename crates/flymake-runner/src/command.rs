//! Tool command description.

use camino::{Utf8Path, Utf8PathBuf};
use flymake_transform::LineTransformer;
use std::fmt;
use tokio::process::Command;

/// A ready-to-run external tool plus the transformers for its two channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    name: String,
    program: Utf8PathBuf,
    args: Vec<String>,
    current_dir: Option<Utf8PathBuf>,
    stdout: LineTransformer,
    stderr: LineTransformer,
}

impl ToolCommand {
    /// Creates a command with passthrough transformers on both channels.
    pub fn new(name: impl Into<String>, program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            stdout: LineTransformer::Passthrough,
            stderr: LineTransformer::Passthrough,
        }
    }

    /// Appends arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory of the child process.
    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Sets the transformer applied to standard output.
    pub fn stdout_transformer(mut self, transformer: LineTransformer) -> Self {
        self.stdout = transformer;
        self
    }

    /// Sets the transformer applied to standard error.
    pub fn stderr_transformer(mut self, transformer: LineTransformer) -> Self {
        self.stderr = transformer;
        self
    }

    /// Returns the tool name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Utf8Path> {
        self.current_dir.as_deref()
    }

    pub fn stdout(&self) -> &LineTransformer {
        &self.stdout
    }

    pub fn stderr(&self) -> &LineTransformer {
        &self.stderr
    }

    /// Builds the process command. The environment is inherited unchanged.
    pub(crate) fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_to_passthrough() {
        let cmd = ToolCommand::new("vet", "go");
        assert_eq!(cmd.stdout(), &LineTransformer::Passthrough);
        assert_eq!(cmd.stderr(), &LineTransformer::Passthrough);
        assert!(cmd.arguments().is_empty());
        assert!(cmd.working_dir().is_none());
    }

    #[test]
    fn test_builder() {
        let cmd = ToolCommand::new("fmt", "/usr/local/go/bin/gofmt")
            .args(["-d", "main.go"])
            .current_dir("/src/app")
            .stdout_transformer(LineTransformer::diff("fmt"));

        assert_eq!(cmd.name(), "fmt");
        assert_eq!(cmd.program().as_str(), "/usr/local/go/bin/gofmt");
        assert_eq!(cmd.arguments(), ["-d", "main.go"]);
        assert_eq!(cmd.working_dir().map(Utf8Path::as_str), Some("/src/app"));
        assert_eq!(cmd.stdout(), &LineTransformer::diff("fmt"));
        assert_eq!(cmd.to_string(), "/usr/local/go/bin/gofmt -d main.go");
    }
}
