//! Collaborator interfaces consumed by media binding
//!
//! Implementations use interior mutability so a single run or artifact can
//! be shared (`Arc<dyn Run>`, `Arc<dyn Artifact>`) between the media objects
//! logged into it.

use crate::error::StoreResult;
use crate::manifest::ManifestEntry;
use mediabind_core::{ArtifactId, RunId};
use std::path::{Path, PathBuf};

/// A mutable working directory for one execution
pub trait Run: Send + Sync {
    /// Run identity
    fn id(&self) -> RunId;

    /// Root of the run's file tree
    fn directory(&self) -> &Path;

    /// Called after a file has been written into the run tree
    ///
    /// `relative_path` is `/`-separated and relative to [`Run::directory`].
    fn on_new_tracked_file(&self, relative_path: &str);
}

/// An addressable artifact entry
pub trait PathHandle: Send {
    /// URL that other artifacts can store as a reference to this entry
    fn ref_url(&self) -> String;

    /// Materialize the entry as a local file and return its path
    fn download(&self) -> StoreResult<PathBuf>;
}

/// Read side of an artifact
pub trait PublicArtifact: Send + Sync {
    /// Resolve an entry by name
    fn get_path(&self, name: &str) -> StoreResult<Box<dyn PathHandle>>;
}

/// An immutable, versioned bundle of named entries
pub trait Artifact: PublicArtifact {
    /// Artifact identity
    fn id(&self) -> ArtifactId;

    /// Name under which `local_path` was previously added, if any
    fn added_local_path_name(&self, local_path: &Path) -> Option<String>;

    /// Add a local file under `name`
    ///
    /// The returned entry's `path` is the authoritative name, which may differ
    /// from the requested one.
    fn add_file(&self, local_path: &Path, name: &str, is_tmp: bool) -> StoreResult<ManifestEntry>;

    /// Add an entry that points at content stored elsewhere
    fn add_reference(&self, uri: &str, name: &str) -> StoreResult<()>;

    /// Local directory entries are materialized under
    fn default_root(&self) -> PathBuf;

    /// Reference URL of an entry in this exact artifact version, when the
    /// artifact is addressable
    fn entry_ref_url(&self, name: &str) -> Option<String>;

    /// Reference URL of the entry in the latest version of this artifact's
    /// sequence
    fn latest_entry_ref_url(&self, name: &str) -> Option<String>;
}
