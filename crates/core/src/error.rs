//! Error types for media binding and serialization.
//!
//! Every precondition violation is reported synchronously at the call that
//! violates it. Nothing in this workspace retries internally.

use crate::types::RunId;
use thiserror::Error;

/// All mediabind errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The forced extension is not a suffix of the attached path
    #[error("media file extension \"{extension}\" must occur at the end of path \"{path}\"")]
    InvalidExtension {
        /// Forced extension
        extension: String,
        /// Path that was attached
        path: String,
    },

    /// Operation requires a prior attach
    #[error("media file not staged: attach must be called first")]
    NotStaged,

    /// Operation requires a prior bind to a run
    #[error("media must be bound to a run before it can be serialized for that run")]
    NotBound,

    /// Key is not a safe filename component
    #[error("invalid media key {0:?}: remove invalid filename characters")]
    InvalidKey(String),

    /// Invalid argument to an operation
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Media bound to one run was used against another
    #[error("media is bound to run {bound}, not run {requested}")]
    RunMismatch {
        /// Run the media is bound to
        bound: RunId,
        /// Run the operation was called with
        requested: RunId,
    },

    /// A referenced artifact entry could not be resolved or downloaded
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for mediabind operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a violated precondition of the caller.
    ///
    /// These errors are deterministic: repeating the same call fails again.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::InvalidExtension { .. }
                | Error::NotStaged
                | Error::NotBound
                | Error::InvalidKey(_)
                | Error::InvalidArgument(_)
                | Error::RunMismatch { .. }
        )
    }

    /// Check if this is a not-staged error.
    pub fn is_not_staged(&self) -> bool {
        matches!(self, Error::NotStaged)
    }

    /// Check if this is a run mismatch error.
    pub fn is_run_mismatch(&self) -> bool {
        matches!(self, Error::RunMismatch { .. })
    }

    /// Check if a referenced source could not be reached.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Error::SourceUnavailable(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
