//! Local filesystem artifact
//!
//! Entries are materialized under the artifact root at their entry name.
//! Added files are hard-linked when possible and copied otherwise. Staged
//! (temporary) files are renamed to a digest-derived stem so that distinct
//! staged files never collide.
//!
//! ## Addressing
//!
//! Once finalized, entries are addressable as
//! `artifact://<artifact id>/<name>`; artifacts that belong to a sequence
//! also expose `artifact://<sequence>:latest/<name>`.
//!
//! References between local artifacts go through [`PathHandle::ref_url`],
//! which is a `file://` URL of the materialized entry so that any other
//! local artifact can download it.

use crate::error::{StoreError, StoreResult};
use crate::manifest::{entry_local_path, validate_entry_name, ArtifactManifest, ManifestEntry};
use crate::traits::{Artifact, PathHandle, PublicArtifact};
use mediabind_core::{sha256_bytes, sha256_file, ArtifactId, ContentHash, HASH_PREFIX_LEN};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// URL scheme of artifact entry references
pub const ARTIFACT_URL_SCHEME: &str = "artifact";

const FILE_URL_PREFIX: &str = "file://";

#[derive(Debug)]
struct ArtifactState {
    manifest: ArtifactManifest,
    added_local_paths: HashMap<PathBuf, String>,
    finalized: bool,
}

/// An artifact stored in a local directory
#[derive(Debug)]
pub struct LocalArtifact {
    root: PathBuf,
    state: Mutex<ArtifactState>,
}

impl LocalArtifact {
    /// Create an empty, writable artifact rooted at `root`
    pub fn create(name: impl Into<String>, root: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::create_with_sequence(name, None, root)
    }

    /// Create an empty artifact that is a version of `sequence`
    pub fn create_in_sequence(
        name: impl Into<String>,
        sequence: impl Into<String>,
        root: impl Into<PathBuf>,
    ) -> StoreResult<Self> {
        Self::create_with_sequence(name, Some(sequence.into()), root)
    }

    fn create_with_sequence(
        name: impl Into<String>,
        sequence: Option<String>,
        root: impl Into<PathBuf>,
    ) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let root = absolute_root(root)?;
        let manifest = ArtifactManifest::new(ArtifactId::new(), name, sequence);
        info!(
            "Created artifact {} ({}) at {}",
            manifest.name,
            manifest.artifact_id,
            root.display()
        );
        Ok(Self::from_manifest(root, manifest, false))
    }

    /// Open a finalized artifact from its `MANIFEST.json`
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = absolute_root(root.into())?;
        let manifest = ArtifactManifest::load(&root)?;
        debug!(
            "Opened artifact {} with {} entries",
            manifest.name,
            manifest.entries.len()
        );
        Ok(Self::from_manifest(root, manifest, true))
    }

    fn from_manifest(root: PathBuf, manifest: ArtifactManifest, finalized: bool) -> Self {
        LocalArtifact {
            root,
            state: Mutex::new(ArtifactState {
                manifest,
                added_local_paths: HashMap::new(),
                finalized,
            }),
        }
    }

    /// Artifact name
    pub fn name(&self) -> String {
        self.state.lock().manifest.name.clone()
    }

    /// Artifact root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot of the manifest
    pub fn manifest(&self) -> ArtifactManifest {
        self.state.lock().manifest.clone()
    }

    /// Entry by name
    pub fn entry(&self, name: &str) -> Option<ManifestEntry> {
        self.state.lock().manifest.get(name).cloned()
    }

    /// Whether the artifact has been finalized
    pub fn is_finalized(&self) -> bool {
        self.state.lock().finalized
    }

    /// Freeze the artifact and persist its manifest
    ///
    /// Finalizing twice is a no-op.
    pub fn finalize(&self) -> StoreResult<()> {
        let mut state = self.state.lock();
        if state.finalized {
            return Ok(());
        }
        state.manifest.store(&self.root)?;
        state.finalized = true;
        info!(
            "Finalized artifact {} with {} entries",
            state.manifest.name,
            state.manifest.entries.len()
        );
        Ok(())
    }

    fn ensure_writable(state: &ArtifactState) -> StoreResult<()> {
        if state.finalized {
            return Err(StoreError::Finalized(state.manifest.name.clone()));
        }
        Ok(())
    }
}

/// Replace the stem of the final name component with `stem`, keeping every
/// dot-separated suffix (`dir/abc.tar.gz` -> `dir/<stem>.tar.gz`).
fn with_stem(name: &str, stem: &str) -> String {
    let (dir, file) = match name.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, name),
    };
    let renamed = match file.split_once('.') {
        Some((_, rest)) => format!("{}.{}", stem, rest),
        None => stem.to_string(),
    };
    match dir {
        Some(dir) => format!("{}/{}", dir, renamed),
        None => renamed,
    }
}

// file:// URLs handed to other artifacts must not depend on the working
// directory
fn absolute_root(root: PathBuf) -> StoreResult<PathBuf> {
    if root.is_absolute() {
        Ok(root)
    } else {
        Ok(std::env::current_dir()?.join(root))
    }
}

fn hash_local(path: &Path) -> StoreResult<(ContentHash, u64)> {
    sha256_file(path).map_err(|e| match e {
        mediabind_core::Error::Io(io_err) => StoreError::Io(io_err),
        other => StoreError::Io(std::io::Error::other(other.to_string())),
    })
}

fn link_or_copy(src: &Path, dest: &Path) -> StoreResult<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    if dest.exists() {
        fs::remove_file(dest)?;
    }
    if fs::hard_link(src, dest).is_err() {
        fs::copy(src, dest)?;
    }
    Ok(())
}

impl PublicArtifact for LocalArtifact {
    fn get_path(&self, name: &str) -> StoreResult<Box<dyn PathHandle>> {
        let state = self.state.lock();
        let entry = state
            .manifest
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::EntryNotFound(name.to_string()))?;
        Ok(Box::new(LocalPathHandle {
            local_path: entry_local_path(&self.root, name),
            entry,
        }))
    }
}

impl Artifact for LocalArtifact {
    fn id(&self) -> ArtifactId {
        self.state.lock().manifest.artifact_id
    }

    fn added_local_path_name(&self, local_path: &Path) -> Option<String> {
        self.state.lock().added_local_paths.get(local_path).cloned()
    }

    fn add_file(&self, local_path: &Path, name: &str, is_tmp: bool) -> StoreResult<ManifestEntry> {
        validate_entry_name(name)?;
        let mut state = self.state.lock();
        Self::ensure_writable(&state)?;

        let (digest, size) = hash_local(local_path)?;

        let name = if is_tmp {
            with_stem(name, digest.prefix(HASH_PREFIX_LEN))
        } else {
            name.to_string()
        };

        let dest = entry_local_path(&self.root, &name);
        if dest != local_path {
            link_or_copy(local_path, &dest)?;
        }

        let entry = ManifestEntry {
            path: name.clone(),
            digest,
            size: Some(size),
            ref_uri: None,
        };
        if let Some(previous) = state.manifest.entries.insert(name.clone(), entry.clone()) {
            if previous.digest != entry.digest {
                warn!("Artifact entry {} replaced with different content", name);
            }
        }
        state
            .added_local_paths
            .insert(local_path.to_path_buf(), name.clone());

        debug!("Added {} as {} ({} bytes)", local_path.display(), name, size);
        Ok(entry)
    }

    fn add_reference(&self, uri: &str, name: &str) -> StoreResult<()> {
        validate_entry_name(name)?;
        let mut state = self.state.lock();
        Self::ensure_writable(&state)?;

        // file:// targets are hashed by content, anything else by URI
        let local_target = uri.strip_prefix(FILE_URL_PREFIX).map(Path::new);
        let (digest, size) = match local_target {
            Some(path) if path.is_file() => {
                let (digest, size) = hash_local(path)?;
                (digest, Some(size))
            }
            _ => (sha256_bytes(uri.as_bytes()), None),
        };

        state.manifest.entries.insert(
            name.to_string(),
            ManifestEntry {
                path: name.to_string(),
                digest,
                size,
                ref_uri: Some(uri.to_string()),
            },
        );
        debug!("Added reference {} -> {}", name, uri);
        Ok(())
    }

    fn default_root(&self) -> PathBuf {
        self.root.clone()
    }

    fn entry_ref_url(&self, name: &str) -> Option<String> {
        let state = self.state.lock();
        if !state.finalized {
            return None;
        }
        Some(format!(
            "{}://{}/{}",
            ARTIFACT_URL_SCHEME,
            state.manifest.artifact_id.simple(),
            name
        ))
    }

    fn latest_entry_ref_url(&self, name: &str) -> Option<String> {
        let state = self.state.lock();
        if !state.finalized {
            return None;
        }
        state
            .manifest
            .sequence
            .as_ref()
            .map(|seq| format!("{}://{}:latest/{}", ARTIFACT_URL_SCHEME, seq, name))
    }
}

/// Handle to one entry of a [`LocalArtifact`]
#[derive(Debug, Clone)]
pub struct LocalPathHandle {
    local_path: PathBuf,
    entry: ManifestEntry,
}

impl LocalPathHandle {
    /// The manifest entry behind this handle
    pub fn entry(&self) -> &ManifestEntry {
        &self.entry
    }
}

impl PathHandle for LocalPathHandle {
    /// `file://` URL of the local copy, or the target of a reference entry
    /// so that chains of references collapse to the original content
    fn ref_url(&self) -> String {
        match &self.entry.ref_uri {
            Some(uri) => uri.clone(),
            None => format!("{}{}", FILE_URL_PREFIX, self.local_path.display()),
        }
    }

    fn download(&self) -> StoreResult<PathBuf> {
        match &self.entry.ref_uri {
            None => {
                if self.local_path.is_file() {
                    Ok(self.local_path.clone())
                } else {
                    Err(StoreError::EntryNotFound(self.entry.path.clone()))
                }
            }
            Some(uri) => {
                if self.local_path.is_file() {
                    return Ok(self.local_path.clone());
                }
                let source = uri
                    .strip_prefix(FILE_URL_PREFIX)
                    .ok_or_else(|| StoreError::Unreachable(uri.clone()))?;
                let source = Path::new(source);
                if !source.is_file() {
                    return Err(StoreError::Unreachable(uri.clone()));
                }
                if let Some(parent) = self.local_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(source, &self.local_path)?;
                debug!(
                    "Materialized reference {} at {}",
                    uri,
                    self.local_path.display()
                );
                Ok(self.local_path.clone())
            }
        }
    }
}
