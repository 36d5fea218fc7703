//! Unified diff annotation.
//!
//! Formatters and rewrite tools report suggestions as a unified diff, which has
//! no notion of "a diagnostic at line N". [`DiffAnnotator`] walks the diff once
//! and synthesizes warnings anchored to lines of the *original* file:
//!
//! - a deletion followed by an addition becomes one `changed` warning,
//! - an addition without a pending deletion becomes an `added` warning,
//! - a deletion that is never paired becomes a `removed line` warning.

use crate::diagnostic::DiagnosticLine;
use regex::Regex;
use std::sync::OnceLock;

/// Prefix of the first line of every diff we accept.
const DIFF_HEADER: &str = "diff ";

/// Suffix newer gofmt versions append to the "old" side of the header.
const ORIG_SUFFIX: &str = ".orig";

/// The `---` and `+++` lines following the header.
const MARKER_LINES: usize = 2;

fn hunk_regex() -> &'static Regex {
    static HUNK: OnceLock<Regex> = OnceLock::new();
    HUNK.get_or_init(|| Regex::new(r"^@@ -([0-9]+)").expect("hunk pattern is valid"))
}

/// Position tracking while walking one diff stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffCursor {
    /// File named in the diff header.
    pub current_file: String,
    /// Current line in the original file.
    pub current_line: usize,
    /// Deletions seen but not yet paired with an addition or flushed.
    pub pending_deletions: usize,
}

impl DiffCursor {
    /// Creates a cursor positioned before the first hunk of `file`.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            current_file: file.into(),
            current_line: 0,
            pending_deletions: 0,
        }
    }

    fn warning(&self, message: String) -> DiagnosticLine {
        DiagnosticLine::warning(self.current_file.clone(), self.current_line, message)
    }

    /// Emits one `removed line` warning per pending deletion.
    ///
    /// Each removed line shifts the following original lines by one, so the
    /// current line advances after every warning.
    fn flush_deletions<E>(
        &mut self,
        label: &str,
        emit: &mut impl FnMut(DiagnosticLine) -> Result<(), E>,
    ) -> Result<(), E> {
        while self.pending_deletions > 0 {
            emit(self.warning(format!("{label}:removed line")))?;
            self.current_line += 1;
            self.pending_deletions -= 1;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum DiffState {
    /// Waiting for the `diff ` header line.
    Header,
    /// Skipping the old/new file marker lines.
    Markers { remaining: usize, cursor: DiffCursor },
    /// Inside the hunks.
    Body(DiffCursor),
    /// The first line was not a diff header; everything is ignored.
    Malformed,
}

/// Stateful converter from a unified diff to [`DiagnosticLine`]s.
#[derive(Debug, Clone)]
pub struct DiffAnnotator {
    label: String,
    state: DiffState,
}

impl DiffAnnotator {
    /// Creates an annotator whose messages are prefixed with `label`
    /// (e.g. `fmt` or `fix`).
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: DiffState::Header,
        }
    }

    /// Returns the label used in generated messages.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the cursor once the header has been accepted.
    pub fn cursor(&self) -> Option<&DiffCursor> {
        match &self.state {
            DiffState::Markers { cursor, .. } | DiffState::Body(cursor) => Some(cursor),
            DiffState::Header | DiffState::Malformed => None,
        }
    }

    /// Returns true if the stream was rejected because of a bad header.
    pub fn is_malformed(&self) -> bool {
        matches!(self.state, DiffState::Malformed)
    }

    /// Consumes one line of the diff.
    pub fn push<E>(
        &mut self,
        line: &str,
        emit: &mut impl FnMut(DiagnosticLine) -> Result<(), E>,
    ) -> Result<(), E> {
        match &mut self.state {
            DiffState::Header => {
                self.state = match parse_header(line) {
                    Some(file) => DiffState::Markers {
                        remaining: MARKER_LINES,
                        cursor: DiffCursor::new(file),
                    },
                    None => DiffState::Malformed,
                };
                Ok(())
            }
            DiffState::Markers { remaining, cursor } => {
                *remaining -= 1;
                if *remaining == 0 {
                    let cursor = std::mem::replace(cursor, DiffCursor::new(String::new()));
                    self.state = DiffState::Body(cursor);
                }
                Ok(())
            }
            DiffState::Body(cursor) => body_line(cursor, &self.label, line, emit),
            DiffState::Malformed => Ok(()),
        }
    }

    /// Signals end of input, flushing any pending deletions.
    pub fn finish<E>(
        mut self,
        emit: &mut impl FnMut(DiagnosticLine) -> Result<(), E>,
    ) -> Result<(), E> {
        match &mut self.state {
            DiffState::Body(cursor) => cursor.flush_deletions(&self.label, emit),
            _ => Ok(()),
        }
    }
}

fn body_line<E>(
    cursor: &mut DiffCursor,
    label: &str,
    line: &str,
    emit: &mut impl FnMut(DiagnosticLine) -> Result<(), E>,
) -> Result<(), E> {
    if let Some(captures) = hunk_regex().captures(line) {
        cursor.flush_deletions(label, emit)?;
        cursor.current_line = captures[1].parse().unwrap_or(0);
    } else if line.starts_with('-') {
        cursor.pending_deletions += 1;
    } else if let Some(added) = line.strip_prefix('+') {
        if cursor.pending_deletions > 0 {
            emit(cursor.warning(format!("{label}:changed: {added}")))?;
            cursor.pending_deletions -= 1;
            cursor.current_line += 1;
        } else {
            // Pure insertion: the original has no line here yet.
            emit(cursor.warning(format!("{label}:added: {added}")))?;
        }
    } else {
        cursor.flush_deletions(label, emit)?;
        cursor.current_line += 1;
    }
    Ok(())
}

/// Extracts the file name from a `diff ` header line.
///
/// Option tokens such as `-u` are skipped and a `.orig` suffix is dropped so
/// the name matches the file being edited.
fn parse_header(line: &str) -> Option<String> {
    let rest = line.strip_prefix(DIFF_HEADER)?;
    let file = rest.split_whitespace().find(|token| !token.starts_with('-'))?;
    Some(file.strip_suffix(ORIG_SUFFIX).unwrap_or(file).to_string())
}
