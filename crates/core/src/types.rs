//! Core identifier types
//!
//! This module defines the identities used throughout the workspace:
//! - [`RunId`]: Unique identifier for a run (a mutable working directory)
//! - [`ArtifactId`]: Unique identifier for an artifact (an immutable bundle)
//! - [`ContentHash`]: SHA-256 content identity of a media file

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a run
///
/// Media bound to a run remembers the run's id; binding or serializing
/// against a run with a different id is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use mediabind_core::types::RunId;
    ///
    /// let id1 = RunId::new();
    /// let id2 = RunId::new();
    /// assert_ne!(id1, id2);
    /// ```
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Create a new random ArtifactId using UUID v4
    pub fn new() -> Self {
        ArtifactId(Uuid::new_v4())
    }

    /// Compact hex form (no hyphens), used inside reference URLs
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SHA-256 content hash, lowercase hex (64 chars)
///
/// Computed once when a file is attached and treated as the immutable
/// identity of the media object from then on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Length of the hex encoding
    pub const HEX_LEN: usize = 64;

    /// Parse a hex digest, normalizing to lowercase
    ///
    /// # Examples
    ///
    /// ```
    /// use mediabind_core::types::ContentHash;
    ///
    /// let hex = "A".repeat(64);
    /// let hash = ContentHash::from_hex(&hex).unwrap();
    /// assert_eq!(hash.as_str(), "a".repeat(64));
    /// assert!(ContentHash::from_hex("abc").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != Self::HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidArgument(format!(
                "content hash must be {} hex chars, got {:?}",
                Self::HEX_LEN,
                hex
            )));
        }
        Ok(ContentHash(hex.to_ascii_lowercase()))
    }

    pub(crate) fn from_digest(bytes: &[u8]) -> Self {
        ContentHash(hex::encode(bytes))
    }

    /// Hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` hex characters (clamped to the full length)
    pub fn prefix(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContentHash {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ContentHash::from_hex(&value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
