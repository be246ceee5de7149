//! Store error types

use mediabind_core::Error;
use thiserror::Error;

/// Errors raised by run and artifact collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry with this name
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// The artifact no longer accepts new entries
    #[error("artifact {0} is finalized")]
    Finalized(String),

    /// Operation requires a finalized artifact
    #[error("artifact {0} is not finalized")]
    NotFinalized(String),

    /// A reference points at storage that cannot be reached from here
    #[error("reference unreachable: {0}")]
    Unreachable(String),

    /// Entry name is not a relative `/`-separated path
    #[error("invalid entry name: {0:?}")]
    InvalidName(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Archive (tar) error
    #[error("archive error: {0}")]
    Archive(String),

    /// Compression (zstd) error
    #[error("compression error: {0}")]
    Compression(String),

    /// A file in a bundle does not match its recorded checksum
    #[error("checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// File inside the bundle
        file: String,
        /// Recorded checksum
        expected: String,
        /// Computed checksum
        actual: String,
    },

    /// A required file is missing from a bundle
    #[error("missing required file: {0}")]
    MissingFile(String),

    /// Bundle format version is not supported
    #[error("unsupported bundle format version: {0}")]
    UnsupportedVersion(u32),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create an archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        StoreError::Archive(msg.into())
    }

    /// Create a compression error
    pub fn compression(msg: impl Into<String>) -> Self {
        StoreError::Compression(msg.into())
    }

    /// Create a missing file error
    pub fn missing_file(name: impl Into<String>) -> Self {
        StoreError::MissingFile(name.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

// Collaborator failures surface to media callers as the binding error kinds
impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io(io_err) => Error::Io(io_err),
            StoreError::Finalized(_) | StoreError::NotFinalized(_) | StoreError::InvalidName(_) => {
                Error::InvalidArgument(e.to_string())
            }
            other => Error::SourceUnavailable(other.to_string()),
        }
    }
}
