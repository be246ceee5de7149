//! Artifact bundle writer

use crate::artifact::LocalArtifact;
use crate::bundle::types::{paths, xxh3_hex, BundleExportInfo, BundleHeader, BUNDLE_FORMAT_VERSION};
use crate::error::{StoreError, StoreResult};
use crate::manifest::entry_local_path;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const ZSTD_LEVEL: i32 = 3;

/// Writer for artifact bundles
pub struct ArtifactBundleWriter;

impl ArtifactBundleWriter {
    /// Export a finalized artifact to `path`
    ///
    /// Reference entries are carried in the manifest only; their targets are
    /// not copied into the bundle.
    pub fn export(artifact: &LocalArtifact, path: &Path) -> StoreResult<BundleExportInfo> {
        if !artifact.is_finalized() {
            return Err(StoreError::NotFinalized(artifact.name()));
        }

        let manifest = artifact.manifest();
        let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;

        // BTreeMap keeps member order stable so bundles are reproducible
        let mut members: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        for (name, entry) in &manifest.entries {
            if entry.is_reference() {
                continue;
            }
            let data = fs::read(entry_local_path(artifact.root(), name))?;
            members.insert(paths::file_member(name), data);
        }
        let file_count = members.len();
        members.insert(paths::MANIFEST.to_string(), manifest_bytes);

        let checksums = members
            .iter()
            .map(|(name, data)| (name.clone(), xxh3_hex(data)))
            .collect();
        let header = BundleHeader {
            format_version: BUNDLE_FORMAT_VERSION,
            artifact_id: manifest.artifact_id,
            checksums,
        };
        let header_bytes = serde_json::to_vec_pretty(&header)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let encoder = zstd::Encoder::new(BufWriter::new(file), ZSTD_LEVEL)
            .map_err(|e| StoreError::compression(format!("zstd encode: {}", e)))?;
        let mut builder = tar::Builder::new(encoder);

        append_member(&mut builder, &paths::archive_path(paths::HEADER), &header_bytes)?;
        for (name, data) in &members {
            append_member(&mut builder, &paths::archive_path(name), data)?;
        }

        let encoder = builder
            .into_inner()
            .map_err(|e| StoreError::archive(format!("finish tar: {}", e)))?;
        let mut writer = encoder
            .finish()
            .map_err(|e| StoreError::compression(format!("zstd finish: {}", e)))?;
        writer.flush()?;
        drop(writer);

        let bundle_size_bytes = fs::metadata(path)?.len();
        info!(
            "Exported artifact {} to {} ({} files, {} bytes)",
            manifest.name,
            path.display(),
            file_count,
            bundle_size_bytes
        );

        Ok(BundleExportInfo {
            artifact_id: manifest.artifact_id,
            path: path.to_path_buf(),
            entry_count: manifest.entries.len(),
            file_count,
            bundle_size_bytes,
        })
    }
}

fn append_member<W: Write>(builder: &mut tar::Builder<W>, path: &str, data: &[u8]) -> StoreResult<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    builder
        .append_data(&mut header, path, data)
        .map_err(|e| StoreError::archive(format!("append {}: {}", path, e)))
}
