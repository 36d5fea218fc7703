//! Line transformers for flymake diagnostics.
//!
//! Go tools report problems in different shapes: the compiler already prints
//! `file:line:message`, `go vet` omits a severity, and `gofmt`/`go tool fix`
//! only produce unified diffs. This crate normalizes all of them into
//! `file:line:severity:message` lines.
//!
//! # Example
//!
//! ```
//! use flymake_transform::LineTransformer;
//!
//! let diff = [
//!     "diff main.go.orig main.go",
//!     "--- main.go.orig",
//!     "+++ main.go",
//!     "@@ -4 +4 @@",
//!     "-x:=1",
//!     "+x := 1",
//! ];
//! let lines = LineTransformer::diff("fmt").transform_lines(diff);
//! assert_eq!(lines, vec!["main.go:4:warning:fmt:changed: x := 1"]);
//! ```

mod diagnostic;
mod diff;
mod transformer;

pub use diagnostic::{DiagnosticLine, Severity};
pub use diff::{DiffAnnotator, DiffCursor};
pub use transformer::{annotate_severity, LineTransformer, TransformStream};
