//! Public types re-exported from the workspace crates.

// Errors
pub use mediabind_core::{Error, Result};

// Identity
pub use mediabind_core::{ArtifactId, ContentHash, RunId};

// Media kinds and binding options
pub use mediabind_core::{BindOptions, FilenameCheck, MediaKind};

// Descriptors
pub use mediabind_core::{ArtifactDescriptor, RunFileDescriptor, FILE_TYPE_TAG};

// Collaborators
pub use mediabind_store::{Artifact, PathHandle, PublicArtifact, Run};

// Local collaborator implementations
pub use mediabind_store::{ArtifactManifest, LocalArtifact, LocalRun, ManifestEntry};

// Store errors
pub use mediabind_store::{StoreError, StoreResult};

// Staging
pub use mediabind_staging::{StagingArea, StagingConfig};
