//! Artifact manifest
//!
//! The manifest is the artifact's file/reference table: a sorted map from
//! entry name to [`ManifestEntry`]. It is persisted as `MANIFEST.json` in the
//! artifact root.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use mediabind_core::{ArtifactId, ContentHash};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Manifest file name inside an artifact root
pub const MANIFEST_FILE: &str = "MANIFEST.json";

/// Current manifest format version
pub const MANIFEST_FORMAT_VERSION: u32 = 1;

/// One named entry of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Entry name, `/`-separated
    pub path: String,
    /// SHA-256 of the content (of the URI for unresolvable references)
    pub digest: ContentHash,
    /// Size in bytes, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Target of a reference entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_uri: Option<String>,
}

impl ManifestEntry {
    /// Whether this entry points at content stored elsewhere
    pub fn is_reference(&self) -> bool {
        self.ref_uri.is_some()
    }
}

/// The full entry table of an artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    /// Format version
    pub format_version: u32,
    /// Artifact identity
    pub artifact_id: ArtifactId,
    /// Artifact name
    pub name: String,
    /// Sequence the artifact is a version of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Entries by name
    pub entries: BTreeMap<String, ManifestEntry>,
}

impl ArtifactManifest {
    /// Empty manifest
    pub fn new(artifact_id: ArtifactId, name: impl Into<String>, sequence: Option<String>) -> Self {
        ArtifactManifest {
            format_version: MANIFEST_FORMAT_VERSION,
            artifact_id,
            name: name.into(),
            sequence,
            created_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }

    /// Read `MANIFEST.json` from an artifact root
    pub fn load(root: &Path) -> StoreResult<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(StoreError::missing_file(MANIFEST_FILE));
        }
        let data = std::fs::read(&path)?;
        let manifest: ArtifactManifest = serde_json::from_slice(&data)?;
        if manifest.format_version != MANIFEST_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion(manifest.format_version));
        }
        for name in manifest.entries.keys() {
            validate_entry_name(name)?;
        }
        Ok(manifest)
    }

    /// Write `MANIFEST.json` into an artifact root
    pub fn store(&self, root: &Path) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(root.join(MANIFEST_FILE), data)?;
        Ok(())
    }

    /// Look up an entry
    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.get(name)
    }
}

/// Reject names that are empty, absolute, or escape the artifact root
pub fn validate_entry_name(name: &str) -> StoreResult<()> {
    let bad = name.is_empty()
        || name.starts_with('/')
        || name.contains('\\')
        || name
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == "..")
        || name == MANIFEST_FILE;
    if bad {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Local path of entry `name` under `root`
pub fn entry_local_path(root: &Path, name: &str) -> PathBuf {
    name.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part))
}
