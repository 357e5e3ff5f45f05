#![warn(clippy::all, clippy::pedantic)]

use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors raised by the shell core.
///
/// Only some of these ever travel up a call stack. The scan notes
/// (`DirectoryUnreadable`, `IndexCapacityTruncated`) are built purely to be
/// logged while the index is constructed.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("command index reached its capacity of {capacity} entries")]
    IndexCapacityTruncated { capacity: usize },

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("line editor failure: {0}")]
    LineEditor(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Whether the main loop has to stop because of this error.
    ///
    /// A failed spawn is reported and the loop keeps going; losing the
    /// terminal is not recoverable.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::LineEditor(_))
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_failure_is_not_fatal() {
        let err = ShellError::Spawn {
            command: "nope".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("`nope`"));
    }

    #[test]
    fn terminal_io_is_fatal() {
        let err = ShellError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(err.is_fatal());
        assert!(ShellError::LineEditor("gone".into()).is_fatal());
    }
}
