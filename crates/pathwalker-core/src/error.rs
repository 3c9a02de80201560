/// Error types for scanning operations.
///
/// Only conditions that end a scan live here. Per-entry problems that the
/// walker tolerates are reported as [`SkippedEntry`](crate::scanner::progress::SkippedEntry)
/// values instead.
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a root path was rejected before traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPathReason {
    /// No path was supplied.
    Empty,
    /// Nothing exists at the path.
    NotFound,
    /// The path exists but is not a directory.
    NotADirectory,
    /// The directory exists but cannot be listed.
    Inaccessible,
}

impl fmt::Display for InvalidPathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Empty => "path is empty",
            Self::NotFound => "path does not exist",
            Self::NotADirectory => "path is not a directory",
            Self::Inaccessible => "directory cannot be read",
        };
        f.write_str(text)
    }
}

/// Errors that end a scan without a result.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root was rejected; traversal never started.
    #[error("Invalid path {}: {reason}", .path.display())]
    InvalidPath {
        path: PathBuf,
        reason: InvalidPathReason,
    },

    /// The walk could not continue (root unreadable or removed mid-scan).
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cancellation was requested through the scan handle.
    #[error("Scan cancelled")]
    Cancelled,

    /// The background worker thread could not be created.
    #[error("Failed to spawn scanner thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl ScanError {
    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: InvalidPathReason) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for rejections that happen before any traversal.
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_message_names_path_and_reason() {
        let err = ScanError::invalid("/no/such/dir", InvalidPathReason::NotFound);
        let msg = err.to_string();
        assert!(msg.contains("/no/such/dir"));
        assert!(msg.contains("does not exist"));
        assert!(err.is_invalid_path());
    }

    #[test]
    fn io_error_keeps_source() {
        let err = ScanError::io(
            "/root",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!err.is_invalid_path());
        assert!(std::error::Error::source(&err).is_some());
    }
}
