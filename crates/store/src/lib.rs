//! Run and artifact collaborators
//!
//! Media binding talks to its two containers only through the traits in
//! [`traits`]:
//! - [`Run`]: a mutable working directory that tracks newly written files
//! - [`Artifact`]: an immutable, content-addressed bundle of named entries
//! - [`PublicArtifact`]: the read side of an artifact
//! - [`PathHandle`]: an addressable entry that can be downloaded locally
//!
//! Local filesystem implementations are provided by [`LocalRun`] and
//! [`LocalArtifact`]. Finalized artifacts can be exported as portable
//! `.artifact.tar.zst` bundles with [`bundle`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod bundle;
pub mod error;
pub mod manifest;
pub mod run;
pub mod traits;

pub use artifact::{LocalArtifact, LocalPathHandle, ARTIFACT_URL_SCHEME};
pub use error::{StoreError, StoreResult};
pub use manifest::{ArtifactManifest, ManifestEntry, MANIFEST_FILE};
pub use run::LocalRun;
pub use traits::{Artifact, PathHandle, PublicArtifact, Run};
