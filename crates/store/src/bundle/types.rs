//! Bundle format types

use mediabind_core::ArtifactId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Current bundle format version
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

/// File extension of bundles
pub const BUNDLE_EXTENSION: &str = ".artifact.tar.zst";

/// Member names inside the archive
///
/// Every member lives under [`paths::ROOT`]; the other names are relative to
/// it and are also the keys of [`BundleHeader::checksums`].
pub mod paths {
    /// Root directory of every archive member
    pub const ROOT: &str = "artifact";
    /// Bundle header
    pub const HEADER: &str = "BUNDLE.json";
    /// Artifact manifest
    pub const MANIFEST: &str = "MANIFEST.json";
    /// Directory holding entry contents
    pub const FILES: &str = "files";

    /// Member holding the content of entry `name`
    pub fn file_member(name: &str) -> String {
        format!("{}/{}", FILES, name)
    }

    /// Full archive path of `member`
    pub fn archive_path(member: &str) -> String {
        format!("{}/{}", ROOT, member)
    }
}

/// Contents of `BUNDLE.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleHeader {
    /// Format version
    pub format_version: u32,
    /// Artifact identity
    pub artifact_id: ArtifactId,
    /// xxh3 checksums keyed by path relative to the archive root
    pub checksums: BTreeMap<String, String>,
}

/// Result of exporting a bundle
#[derive(Debug, Clone)]
pub struct BundleExportInfo {
    /// Artifact identity
    pub artifact_id: ArtifactId,
    /// Where the bundle was written
    pub path: PathBuf,
    /// Number of manifest entries (files and references)
    pub entry_count: usize,
    /// Number of entry files stored in the archive
    pub file_count: usize,
    /// Bundle size in bytes
    pub bundle_size_bytes: u64,
}

/// Result of validating a bundle
#[derive(Debug, Clone)]
pub struct BundleVerifyInfo {
    /// Artifact identity
    pub artifact_id: ArtifactId,
    /// Format version
    pub format_version: u32,
    /// Number of manifest entries
    pub entry_count: usize,
    /// Whether every checksum matched
    pub checksums_valid: bool,
}

/// xxh3 checksum as 16 hex chars
pub fn xxh3_hex(data: &[u8]) -> String {
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(data))
}
