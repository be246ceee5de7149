//! JSON descriptors produced by serialization
//!
//! Two shapes are produced, one per container:
//!
//! ```text
//! bound to a run:      {"_type": "file", "path": "media/images/img_0_<id>.png",
//!                       "sha256": "<64 hex>", "size": 10,
//!                       "artifact_path"?: "...", "_latest_artifact_path"?: "..."}
//! added to artifact:   {"path": "media/images/<hash20>/a.png", "sha256": "<64 hex>",
//!                       "_type": "image-file"}
//! ```
//!
//! Field names are the wire contract consumed by the front end.

use crate::types::ContentHash;
use serde::{Deserialize, Serialize};

/// Type tag of run file descriptors
pub const FILE_TYPE_TAG: &str = "file";

/// Descriptor of media bound to a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFileDescriptor {
    /// Always [`FILE_TYPE_TAG`]
    #[serde(rename = "_type", alias = "type")]
    pub type_tag: String,
    /// Path relative to the run directory, `/`-separated
    pub path: String,
    /// Content hash
    pub sha256: ContentHash,
    /// Size in bytes at attach time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Reference URL of the artifact entry this object was logged as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,
    /// Reference URL of the same entry in the latest version of the artifact
    #[serde(
        rename = "_latest_artifact_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_artifact_path: Option<String>,
}

impl RunFileDescriptor {
    /// Create a descriptor without artifact links
    pub fn new(path: impl Into<String>, sha256: ContentHash, size: Option<u64>) -> Self {
        RunFileDescriptor {
            type_tag: FILE_TYPE_TAG.to_string(),
            path: path.into(),
            sha256,
            size,
            artifact_path: None,
            latest_artifact_path: None,
        }
    }
}

/// Descriptor of media added to an artifact
///
/// `path` and `sha256` are absent for objects without a backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Entry name inside the artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Content hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<ContentHash>,
    /// Concrete media kind tag
    #[serde(rename = "_type")]
    pub type_tag: String,
}

impl ArtifactDescriptor {
    /// Descriptor carrying only the type tag
    pub fn type_only(type_tag: impl Into<String>) -> Self {
        ArtifactDescriptor {
            path: None,
            sha256: None,
            type_tag: type_tag.into(),
        }
    }
}
