//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = IbpeError> = std::result::Result<T, E>;

/// Domain-specific error describing failures during configuration, IO, or
/// vocabulary-file handling.
#[derive(Debug, Error)]
pub enum IbpeError {
    /// Training configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// The vocabulary file violates the on-disk format.
    #[error("vocabulary file format error: {0}")]
    Format(String),
    /// Serialization failure while rendering a status snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Catch-all variant for invariants that should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for IbpeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl IbpeError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }

    /// Process exit code the CLI reports for this error class.
    ///
    /// Usage errors exit with clap's own code (2); the classes below keep the
    /// remaining failure taxonomy distinguishable to callers.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfig(_) => 3,
            Self::Io { .. } => 4,
            Self::Format(_) => 5,
            Self::Serialization(_) | Self::Internal(_) => 6,
        }
    }
}
