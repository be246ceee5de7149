//! Artifact bundle reader
//!
//! Reads .artifact.tar.zst archives and validates their contents.

use crate::artifact::LocalArtifact;
use crate::bundle::types::{paths, xxh3_hex, BundleHeader, BundleVerifyInfo, BUNDLE_FORMAT_VERSION};
use crate::error::{StoreError, StoreResult};
use crate::manifest::{entry_local_path, validate_entry_name, ArtifactManifest};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use tar::Archive;
use tracing::{debug, info};

/// Reader for artifact bundles
pub struct ArtifactBundleReader;

impl ArtifactBundleReader {
    /// Validate a bundle's integrity
    ///
    /// Checks:
    /// - Archive can be decompressed
    /// - BUNDLE.json and MANIFEST.json exist and parse
    /// - Format version is supported
    /// - Every member matches its recorded checksum
    pub fn validate(path: &Path) -> StoreResult<BundleVerifyInfo> {
        let files = Self::read_members(path)?;
        let header = Self::parse_header(&files)?;
        let manifest = Self::parse_manifest(&files)?;

        let checksums_valid = header.checksums.iter().all(|(name, expected)| {
            files
                .get(name)
                .map(|data| &xxh3_hex(data) == expected)
                .unwrap_or(false)
        });

        Ok(BundleVerifyInfo {
            artifact_id: header.artifact_id,
            format_version: header.format_version,
            entry_count: manifest.entries.len(),
            checksums_valid,
        })
    }

    /// Read and parse the artifact manifest
    pub fn read_manifest(path: &Path) -> StoreResult<ArtifactManifest> {
        let files = Self::read_members(path)?;
        Self::parse_header(&files)?;
        Self::parse_manifest(&files)
    }

    /// Restore the bundle into `dest` and open it as a finalized artifact
    ///
    /// Fails with `ChecksumMismatch` on the first member that does not match.
    pub fn unpack(path: &Path, dest: &Path) -> StoreResult<LocalArtifact> {
        let files = Self::read_members(path)?;
        let header = Self::parse_header(&files)?;

        for (name, expected) in &header.checksums {
            let data = files
                .get(name)
                .ok_or_else(|| StoreError::missing_file(name.clone()))?;
            let actual = xxh3_hex(data);
            if &actual != expected {
                return Err(StoreError::ChecksumMismatch {
                    file: name.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let manifest = Self::parse_manifest(&files)?;
        fs::create_dir_all(dest)?;

        let mut restored = 0usize;
        for (name, entry) in &manifest.entries {
            validate_entry_name(name)?;
            if entry.is_reference() {
                continue;
            }
            let member = paths::file_member(name);
            let data = files
                .get(&member)
                .ok_or_else(|| StoreError::missing_file(member.clone()))?;
            let target = entry_local_path(dest, name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, data)?;
            restored += 1;
        }
        manifest.store(dest)?;

        info!(
            "Unpacked artifact {} into {} ({} files)",
            manifest.name,
            dest.display(),
            restored
        );

        LocalArtifact::open(dest)
    }

    fn parse_header(files: &HashMap<String, Vec<u8>>) -> StoreResult<BundleHeader> {
        let data = files
            .get(paths::HEADER)
            .ok_or_else(|| StoreError::missing_file(paths::HEADER))?;
        let header: BundleHeader = serde_json::from_slice(data)?;
        if header.format_version != BUNDLE_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion(header.format_version));
        }
        Ok(header)
    }

    fn parse_manifest(files: &HashMap<String, Vec<u8>>) -> StoreResult<ArtifactManifest> {
        let data = files
            .get(paths::MANIFEST)
            .ok_or_else(|| StoreError::missing_file(paths::MANIFEST))?;
        Ok(serde_json::from_slice(data)?)
    }

    /// Read the bundle's members into memory, keyed by their name relative
    /// to [`paths::ROOT`]
    ///
    /// Only regular files that belong to the bundle layout are kept; anything
    /// else is skipped. Members that climb out of the root or appear twice
    /// are rejected.
    fn read_members(path: &Path) -> StoreResult<HashMap<String, Vec<u8>>> {
        let decoder = zstd::Decoder::new(BufReader::new(File::open(path)?))
            .map_err(|e| StoreError::compression(format!("zstd decode: {}", e)))?;
        let mut archive = Archive::new(decoder);
        let root = format!("{}/", paths::ROOT);
        let files_dir = format!("{}/", paths::FILES);
        let mut members = HashMap::new();

        let entries = archive
            .entries()
            .map_err(|e| StoreError::archive(e.to_string()))?;
        for entry in entries {
            let mut entry = entry.map_err(|e| StoreError::archive(e.to_string()))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let archive_path = entry
                .path()
                .map_err(|e| StoreError::archive(e.to_string()))?
                .to_string_lossy()
                .into_owned();

            let member = match archive_path.strip_prefix(&root) {
                Some(member)
                    if member == paths::HEADER
                        || member == paths::MANIFEST
                        || member.starts_with(&files_dir) =>
                {
                    member.to_string()
                }
                _ => {
                    debug!("Skipping bundle member {}", archive_path);
                    continue;
                }
            };
            if member.split('/').any(|part| part == "..") {
                return Err(StoreError::InvalidName(member));
            }

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| StoreError::archive(format!("read {}: {}", member, e)))?;
            if members.insert(member.clone(), data).is_some() {
                return Err(StoreError::archive(format!("duplicate member {}", member)));
            }
        }

        Ok(members)
    }
}
