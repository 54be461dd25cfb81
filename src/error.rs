//! Error types for metric readers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a kernel counter source.
///
/// Readers never hand these to their callers. Every variant collapses to an
/// absent metric at the reader boundary; the error only reaches the log.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The counter source could not be opened or queried.
    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source was read but its content has the wrong shape.
    #[error("failed to parse {0}")]
    Parse(String),

    /// The counters were valid but a denominator was zero or negative.
    #[error("degenerate counters: {0}")]
    Degenerate(&'static str),
}

impl ReadError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReadError::Unreadable {
            path: path.into(),
            source,
        }
    }
}
