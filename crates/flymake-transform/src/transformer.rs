//! Line transformers.

use crate::diagnostic::Severity;
use crate::diff::DiffAnnotator;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::OnceLock;

fn line_number_regex() -> &'static Regex {
    static LINE_NUMBER: OnceLock<Regex> = OnceLock::new();
    LINE_NUMBER.get_or_init(|| Regex::new(r":[0-9]+:").expect("line number pattern is valid"))
}

/// Inserts a `warning:` marker after the first `:<digits>:` in `line`.
///
/// Lines without a line number delimiter are returned unchanged.
pub fn annotate_severity(line: &str) -> Cow<'_, str> {
    line_number_regex().replace(line, |caps: &Captures| {
        format!("{}{}:", &caps[0], Severity::Warning)
    })
}

/// How the output of one tool channel is turned into diagnostic lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LineTransformer {
    /// Copy each line unchanged.
    #[default]
    Passthrough,
    /// Mark `file:line:` diagnostics as warnings.
    SeverityAnnotate,
    /// Convert a unified diff into synthetic warnings.
    DiffAnnotate {
        /// Tool label used in generated messages.
        label: String,
    },
}

impl LineTransformer {
    /// Creates a diff transformer with the given label.
    pub fn diff(label: impl Into<String>) -> Self {
        Self::DiffAnnotate {
            label: label.into(),
        }
    }

    /// Returns a short name for logging.
    pub fn name(&self) -> &str {
        match self {
            Self::Passthrough => "passthrough",
            Self::SeverityAnnotate => "severity",
            Self::DiffAnnotate { label } => label,
        }
    }

    /// Creates fresh state for transforming one input stream.
    pub fn stream(&self) -> TransformStream {
        match self {
            Self::Passthrough => TransformStream::Passthrough,
            Self::SeverityAnnotate => TransformStream::SeverityAnnotate,
            Self::DiffAnnotate { label } => {
                TransformStream::DiffAnnotate(DiffAnnotator::new(label.clone()))
            }
        }
    }

    /// Transforms a complete buffer of lines.
    pub fn transform_lines<'a, I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut output = Vec::new();
        let mut emit = |line: &str| -> Result<(), Infallible> {
            output.push(line.to_string());
            Ok(())
        };

        let mut stream = self.stream();
        for line in lines {
            if let Err(never) = stream.push(line, &mut emit) {
                match never {}
            }
        }
        if let Err(never) = stream.finish(&mut emit) {
            match never {}
        }
        output
    }
}

/// Per-stream transformer state.
///
/// Only the diff variant carries state; it is owned by the task draining the
/// stream and never shared.
#[derive(Debug, Clone)]
pub enum TransformStream {
    Passthrough,
    SeverityAnnotate,
    DiffAnnotate(DiffAnnotator),
}

impl TransformStream {
    /// Feeds one line (without its terminator), emitting zero or more lines.
    pub fn push<E>(
        &mut self,
        line: &str,
        emit: &mut impl FnMut(&str) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Self::Passthrough => emit(line),
            Self::SeverityAnnotate => emit(&annotate_severity(line)),
            Self::DiffAnnotate(annotator) => {
                annotator.push(line, &mut |diag| emit(&diag.to_string()))
            }
        }
    }

    /// Signals end of input.
    pub fn finish<E>(self, emit: &mut impl FnMut(&str) -> Result<(), E>) -> Result<(), E> {
        match self {
            Self::Passthrough | Self::SeverityAnnotate => Ok(()),
            Self::DiffAnnotate(annotator) => annotator.finish(&mut |diag| emit(&diag.to_string())),
        }
    }
}
