//! Error types for the sales normalization pipeline.
//!
//! - [`InputFormatError`] - the input is not a two-row-header table
//! - [`NormalizeError`] - top-level error returned by [`crate::normalize`]
//!
//! Values that fail numeric coercion or equal zero are *not* errors; they are
//! counted in [`crate::NormalizeStats`] and silently excluded.

use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Input Format Errors
// =============================================================================

/// The input could not be parsed with the expected two-row header shape.
///
/// `line` is 1-based; `0` means the error is not tied to a specific line.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFormatError {
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for InputFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (0, _) => write!(f, "{}", self.message),
            (line, Some(col)) => write!(f, "Line {}, column {}: {}", line, col, self.message),
            (line, None) => write!(f, "Line {}: {}", line, self.message),
        }
    }
}

impl std::error::Error for InputFormatError {}

impl InputFormatError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            message: message.into(),
        }
    }

    /// Attach a 1-based column position.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Errors surfaced by [`crate::normalize`]. Neither kind is retried.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Input has no usable two-row header or identifier column.
    #[error("Input format error: {0}")]
    InputFormat(#[from] InputFormatError),

    /// Input unreadable or output unwritable.
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NormalizeError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap a `csv` writer error. Everything the writer can fail on is I/O
    /// from the caller's point of view.
    pub fn from_csv_write(path: impl AsRef<Path>, err: csv::Error) -> Self {
        let source = match err.into_kind() {
            csv::ErrorKind::Io(e) => e,
            other => std::io::Error::other(format!("{:?}", other)),
        };
        Self::io(path, source)
    }

    /// Whether this error came from the filesystem rather than the content.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing operations.
pub type FormatResult<T> = Result<T, InputFormatError>;

/// Result type for normalization operations.
pub type NormalizeResult<T> = Result<T, NormalizeError>;
