//! Media binding lifecycle
//!
//! A [`Media`] object owns the backing file of one piece of media from the
//! moment it is staged until it is bound to a run or serialized into an
//! artifact:
//!
//! ```text
//! new ──attach──> staged ──bind_to_run──> bound ──serialize_for_run──> RunFileDescriptor
//!                   │
//!                   └──serialize_for_artifact (any number of artifacts)──> ArtifactDescriptor
//! ```
//!
//! ## Identity
//!
//! The SHA-256 of the file is computed once at attach time, before any
//! relocation, and is the object's identity from then on: two media objects
//! are equal exactly when both are attached and their hashes match.
//!
//! ## Ownership of the backing file
//!
//! Files in the staging area belong to the media object and are moved when
//! bound to a run. Caller-owned files are always copied. While its file is
//! staged, a media object holds a handle on the staging area, so the area is
//! removed once no staged media is left.

use crate::{Error, Result};
use mediabind_core::filename::{basename, extension_of, relative_to};
use mediabind_core::{
    is_valid_filename, sha256_bytes, sha256_file, wb_filename, ArtifactDescriptor, BindOptions,
    ContentHash, MediaKind, RunFileDescriptor, RunId, HASH_PREFIX_LEN,
};
use mediabind_staging::StagingArea;
use mediabind_store::{Artifact, Run};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Non-owning record of the run a media object is bound to
#[derive(Debug, Clone)]
struct BoundRun {
    id: RunId,
    directory: PathBuf,
}

/// Non-owning link to a named entry of an artifact
///
/// The artifact is held weakly: a media object never keeps an artifact alive.
#[derive(Debug, Clone)]
pub struct ArtifactLink {
    artifact: Weak<dyn Artifact>,
    name: String,
}

impl ArtifactLink {
    /// Link to entry `name` of `artifact`
    pub fn new(artifact: &Arc<dyn Artifact>, name: impl Into<String>) -> Self {
        ArtifactLink {
            artifact: Arc::downgrade(artifact),
            name: name.into(),
        }
    }

    /// Entry name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The artifact, if it is still alive
    pub fn artifact(&self) -> Option<Arc<dyn Artifact>> {
        self.artifact.upgrade()
    }
}

/// A media object of kind `K` and its backing file
#[derive(Debug)]
pub struct Media<K: MediaKind> {
    kind: K,
    path: Option<PathBuf>,
    is_tmp: bool,
    extension: Option<String>,
    sha256: Option<ContentHash>,
    size: Option<u64>,
    caption: Option<String>,
    bound_run: Option<BoundRun>,
    artifact_source: Option<ArtifactLink>,
    artifact_target: Option<ArtifactLink>,
    staging: Option<Arc<StagingArea>>,
}

impl<K: MediaKind> Default for Media<K> {
    fn default() -> Self {
        Self::with_kind(K::default())
    }
}

impl<K: MediaKind> Media<K> {
    /// An empty media object with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty media object carrying a specific kind value
    pub fn with_kind(kind: K) -> Self {
        Media {
            kind,
            path: None,
            is_tmp: false,
            extension: None,
            sha256: None,
            size: None,
            caption: None,
            bound_run: None,
            artifact_source: None,
            artifact_target: None,
            staging: None,
        }
    }

    /// Media backed by a caller-owned file
    ///
    /// The file is hashed now and copied (never moved) when bound to a run.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut media = Self::new();
        media.attach(path, false, None)?;
        Ok(media)
    }

    /// Media backed by `data`, written into the process-wide staging area
    ///
    /// `extension` may be given with or without the leading dot.
    pub fn from_bytes(data: &[u8], extension: &str) -> Result<Self> {
        let area = mediabind_staging::global()?;
        let staged = area.stage_bytes(data, extension)?;
        let mut media = Self::new();
        media.attach(staged, true, None)?;
        media.staging = Some(area);
        Ok(media)
    }

    /// Media that refers to external storage by URI instead of a local file
    ///
    /// Only kinds that recognise `uri` as a reference path accept this. The
    /// identity is the hash of the URI itself and no size is recorded.
    pub fn from_reference(uri: &str) -> Result<Self> {
        if !K::is_reference_path(uri) {
            return Err(Error::InvalidArgument(format!(
                "{:?} is not a reference path for {}",
                uri,
                K::LOG_TYPE
            )));
        }
        let mut media = Self::new();
        media.path = Some(PathBuf::from(uri));
        media.sha256 = Some(sha256_bytes(uri.as_bytes()));
        debug!("Attached {} reference {}", K::LOG_TYPE, uri);
        Ok(media)
    }

    /// Set the display caption
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    // =========================================================================
    // Identity & staging
    // =========================================================================

    /// Record the backing file and compute its content identity.
    ///
    /// `is_tmp` declares that `path` lives in a staging area owned by this
    /// object. When `extension` is given it must be a suffix of `path`; it
    /// then overrides the suffix used for run-binding filenames.
    ///
    /// Nothing is moved here. Attaching an already attached object fails with
    /// `InvalidArgument`.
    pub fn attach(
        &mut self,
        path: impl AsRef<Path>,
        is_tmp: bool,
        extension: Option<&str>,
    ) -> Result<()> {
        let path = path.as_ref();
        if self.sha256.is_some() {
            return Err(Error::InvalidArgument(
                "media file is already attached".to_string(),
            ));
        }
        if let Some(ext) = extension {
            if !path.to_string_lossy().ends_with(ext) {
                return Err(Error::InvalidExtension {
                    extension: ext.to_string(),
                    path: path.display().to_string(),
                });
            }
        }

        let (sha256, _) = sha256_file(path)?;
        let size = fs::metadata(path)?.len();

        debug!(
            "Attached {} {} (sha256 {}, {} bytes)",
            K::LOG_TYPE,
            path.display(),
            sha256,
            size
        );

        self.path = Some(path.to_path_buf());
        self.is_tmp = is_tmp;
        self.extension = extension.map(str::to_string);
        self.sha256 = Some(sha256);
        self.size = Some(size);
        Ok(())
    }

    /// Whether a backing file has been attached
    pub fn file_is_set(&self) -> bool {
        self.path.is_some() && self.sha256.is_some()
    }

    /// Whether this object has been bound to a run
    pub fn is_bound(&self) -> bool {
        self.bound_run.is_some()
    }

    /// Whether the path is an external reference rather than a local file
    pub fn is_reference(&self) -> bool {
        self.path
            .as_deref()
            .map(|p| K::is_reference_path(&p.to_string_lossy()))
            .unwrap_or(false)
    }

    /// Current location of the backing file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the backing file lives in the staging area
    pub fn is_tmp(&self) -> bool {
        self.is_tmp
    }

    /// Forced extension
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Content hash
    pub fn sha256(&self) -> Option<&ContentHash> {
        self.sha256.as_ref()
    }

    /// Size in bytes at attach time
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Display caption
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Concrete kind value
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Artifact entry this object's content came from
    pub fn artifact_source(&self) -> Option<&ArtifactLink> {
        self.artifact_source.as_ref()
    }

    /// Record that this object's content came from entry `name` of `artifact`
    pub fn set_artifact_source(&mut self, artifact: Arc<dyn Artifact>, name: impl Into<String>) {
        self.artifact_source = Some(ArtifactLink::new(&artifact, name));
    }

    /// Artifact entry this object was itself logged as
    pub fn artifact_target(&self) -> Option<&ArtifactLink> {
        self.artifact_target.as_ref()
    }

    /// Record that this object was logged as entry `name` of `artifact`
    ///
    /// Once the artifact is addressable, run descriptors carry links to that
    /// entry.
    pub fn set_artifact_target(&mut self, artifact: Arc<dyn Artifact>, name: impl Into<String>) {
        self.artifact_target = Some(ArtifactLink::new(&artifact, name));
    }

    // =========================================================================
    // Run binding
    // =========================================================================

    /// Bind this object to `run`, relocating its file into the run tree.
    ///
    /// Equivalent to [`Media::bind_to_run_with`] with default options.
    pub fn bind_to_run(
        &mut self,
        run: &dyn Run,
        key: &str,
        step: impl Display,
        id: Option<&str>,
    ) -> Result<()> {
        self.bind_to_run_with(run, key, step, id, &BindOptions::default())
    }

    /// Bind this object to `run` under `<media subdir>/<key>_<step>_<id><ext>`.
    ///
    /// `id` defaults to the first 20 hex chars of the content hash. Staged
    /// files are moved; caller-owned files are copied. After relocation the
    /// run is notified of the new relative path.
    ///
    /// On error the object is left unchanged.
    pub fn bind_to_run_with(
        &mut self,
        run: &dyn Run,
        key: &str,
        step: impl Display,
        id: Option<&str>,
        options: &BindOptions,
    ) -> Result<()> {
        let (current, sha256) = match (&self.path, &self.sha256) {
            (Some(path), Some(sha256)) => (path.clone(), sha256.clone()),
            _ => return Err(Error::NotStaged),
        };

        if options.filename_check.applies() && !is_valid_filename(key) {
            return Err(Error::InvalidKey(key.to_string()));
        }
        if key.split(['/', '\\']).any(|part| part == "..") {
            return Err(Error::InvalidKey(key.to_string()));
        }
        if key.is_empty() {
            return Err(Error::InvalidArgument("media key must not be empty".to_string()));
        }
        if self.is_reference() {
            return Err(Error::InvalidArgument(format!(
                "{} created from a reference to external storage cannot be added to a run",
                K::LOG_TYPE
            )));
        }
        if let Some(bound) = &self.bound_run {
            if bound.id != run.id() {
                return Err(Error::RunMismatch {
                    bound: bound.id,
                    requested: run.id(),
                });
            }
        }

        let extension = match &self.extension {
            Some(ext) => ext.clone(),
            None => extension_of(&current),
        };
        let id = match id {
            Some(id) => id.to_string(),
            None => sha256.prefix(HASH_PREFIX_LEN).to_string(),
        };

        let file_name = wb_filename(key, step, id, &extension);
        let media_path = format!("{}/{}", K::media_subdir(), file_name);
        let new_path = media_path
            .split('/')
            .fold(run.directory().to_path_buf(), |acc, part| acc.join(part));
        if let Some(parent) = new_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if new_path != current {
            if self.is_tmp {
                move_file(&current, &new_path)?;
                debug!("Moved {} to {}", current.display(), new_path.display());
            } else {
                fs::copy(&current, &new_path)?;
                debug!("Copied {} to {}", current.display(), new_path.display());
            }
        }

        self.path = Some(new_path);
        self.is_tmp = false;
        self.staging = None;
        self.bound_run = Some(BoundRun {
            id: run.id(),
            directory: run.directory().to_path_buf(),
        });
        run.on_new_tracked_file(&media_path);

        info!("Bound {} to run {} as {}", K::LOG_TYPE, run.id(), media_path);
        Ok(())
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Describe this object for the run it is bound to.
    ///
    /// Fails with `NotBound` before [`Media::bind_to_run`] and with
    /// `RunMismatch` for any other run.
    pub fn serialize_for_run(&self, run: &dyn Run) -> Result<RunFileDescriptor> {
        let bound = self.bound_run.as_ref().ok_or(Error::NotBound)?;
        if bound.id != run.id() {
            return Err(Error::RunMismatch {
                bound: bound.id,
                requested: run.id(),
            });
        }
        let (path, sha256) = match (&self.path, &self.sha256) {
            (Some(path), Some(sha256)) => (path, sha256.clone()),
            _ => return Err(Error::Internal("bound media has no file".to_string())),
        };

        let relative = relative_to(path, run.directory())
            .or_else(|| relative_to(path, &bound.directory))
            .ok_or_else(|| {
                Error::Internal(format!(
                    "bound media {} is outside run directory {}",
                    path.display(),
                    run.directory().display()
                ))
            })?;

        let mut descriptor = RunFileDescriptor::new(relative, sha256, self.size);
        if let Some(target) = &self.artifact_target {
            if let Some(artifact) = target.artifact() {
                let entry = K::with_suffix(target.name());
                descriptor.artifact_path = artifact.entry_ref_url(&entry);
                descriptor.latest_artifact_path = artifact.latest_entry_ref_url(&entry);
            }
        }
        Ok(descriptor)
    }

    /// Add this object's file to `artifact` and describe it.
    ///
    /// Objects without a file produce a descriptor carrying only the type tag.
    /// The same source path added twice to one artifact resolves to the same
    /// name. Content that came from another artifact is added as a reference
    /// to that artifact's entry instead of a copy.
    pub fn serialize_for_artifact(&self, artifact: &dyn Artifact) -> Result<ArtifactDescriptor> {
        let (path, sha256) = match (&self.path, &self.sha256) {
            (Some(path), Some(sha256)) => (path, sha256),
            _ => return Ok(ArtifactDescriptor::type_only(K::LOG_TYPE)),
        };

        let name = match artifact.added_local_path_name(path) {
            Some(name) => {
                debug!("Reusing artifact entry {} for {}", name, path.display());
                name
            }
            None => self.add_to_artifact(artifact, path, sha256)?,
        };

        Ok(ArtifactDescriptor {
            path: Some(name),
            sha256: Some(sha256.clone()),
            type_tag: K::LOG_TYPE.to_string(),
        })
    }

    fn add_to_artifact(
        &self,
        artifact: &dyn Artifact,
        path: &Path,
        sha256: &ContentHash,
    ) -> Result<String> {
        let file_name = basename(path);
        let mut name = if self.is_tmp {
            format!("{}/{}", K::media_subdir(), file_name)
        } else {
            // Distinct files sharing a basename get distinct names
            format!(
                "{}/{}/{}",
                K::media_subdir(),
                sha256.prefix(HASH_PREFIX_LEN),
                file_name
            )
        };

        if let Some(source) = &self.artifact_source {
            let source_artifact = source.artifact().ok_or_else(|| {
                Error::SourceUnavailable(format!(
                    "source artifact of entry {} has been dropped",
                    source.name()
                ))
            })?;
            name = relative_to(path, &source_artifact.default_root())
                .unwrap_or_else(|| source.name().to_string());
            let handle = source_artifact
                .get_path(&name)
                .map_err(|e| Error::SourceUnavailable(e.to_string()))?;
            artifact.add_reference(&handle.ref_url(), &name)?;
            debug!("Added {} as reference to {}", name, handle.ref_url());
        } else if self.is_reference() {
            let uri = path.to_string_lossy();
            artifact.add_reference(&uri, &name)?;
            debug!("Added {} as reference to {}", name, uri);
        } else {
            let entry = artifact.add_file(path, &name, self.is_tmp)?;
            if entry.path != name {
                debug!("Artifact renamed {} to {}", name, entry.path);
            }
            name = entry.path;
        }
        Ok(name)
    }

    /// Rebuild a media object from its artifact descriptor.
    ///
    /// The entry is resolved through `source` and downloaded if needed; the
    /// new object records `source` as where its content came from.
    pub fn reconstruct(descriptor: &ArtifactDescriptor, source: Arc<dyn Artifact>) -> Result<Self> {
        if descriptor.type_tag != K::LOG_TYPE {
            return Err(Error::InvalidArgument(format!(
                "descriptor of type {} cannot be read as {}",
                descriptor.type_tag,
                K::LOG_TYPE
            )));
        }
        let name = descriptor
            .path
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument("descriptor has no path".to_string()))?;

        let local = source
            .get_path(name)
            .and_then(|handle| handle.download())
            .map_err(|e| Error::SourceUnavailable(e.to_string()))?;

        let mut media = Self::with_kind(K::from_local_file(&local));
        media.attach(&local, false, None)?;

        if let (Some(expected), Some(actual)) = (&descriptor.sha256, &media.sha256) {
            if expected != actual {
                warn!(
                    "Entry {} content hash {} does not match descriptor {}",
                    name, actual, expected
                );
                return Err(Error::SourceUnavailable(format!(
                    "entry {} does not match its recorded content hash",
                    name
                )));
            }
        }

        media.set_artifact_source(source, name);
        Ok(media)
    }
}

/// Captions of `items` when the first item has one, otherwise `None`.
pub fn captions<K: MediaKind>(items: &[Media<K>]) -> Option<Vec<Option<String>>> {
    let first = items.first()?;
    first.caption.as_ref()?;
    Some(items.iter().map(|m| m.caption.clone()).collect())
}

/// Equality is content identity: both objects attached with the same hash.
impl<K: MediaKind> PartialEq for Media<K> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.sha256, &other.sha256) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Rename, falling back to copy + remove across filesystems.
///
/// A crash between the copy and the remove leaves both files in place.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}
