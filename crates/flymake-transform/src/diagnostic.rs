//! Diagnostic types.

use std::fmt;

/// A single line-anchored diagnostic.
///
/// Rendered as `file:line:severity:message`, the shape flymake parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLine {
    /// The source file the diagnostic refers to.
    source_file: String,
    /// Line number in the original file.
    line_number: usize,
    /// The severity level.
    severity: Severity,
    /// The diagnostic message.
    message: String,
}

impl DiagnosticLine {
    /// Creates a new diagnostic.
    pub fn new(
        source_file: impl Into<String>,
        line_number: usize,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            line_number,
            severity,
            message: message.into(),
        }
    }

    /// Creates a new warning diagnostic.
    pub fn warning(
        source_file: impl Into<String>,
        line_number: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::new(source_file, line_number, Severity::Warning, message)
    }

    /// Returns the source file.
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Returns the line number.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DiagnosticLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.source_file, self.line_number, self.severity, self.message
        )
    }
}

/// The severity of a diagnostic.
///
/// Only warnings are synthesized; errors come verbatim from the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A warning that doesn't prevent compilation.
    Warning,
}

impl Severity {
    /// Returns the severity marker as flymake expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
