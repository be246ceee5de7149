//! Core types for mediabind
//!
//! This crate defines the pieces shared by every other crate in the workspace:
//! - [`ContentHash`]: SHA-256 content identity of a media file
//! - [`RunId`] / [`ArtifactId`]: identifiers of the two container kinds
//! - [`MediaKind`]: capability trait implemented by each concrete media kind
//! - Descriptors: the JSON shapes produced when media is serialized
//! - Filename rules used when deriving destination paths
//! - [`Error`]: the error taxonomy for binding and serialization

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptor;
pub mod digest;
pub mod error;
pub mod filename;
pub mod kind;
pub mod options;
pub mod types;

pub use descriptor::{ArtifactDescriptor, RunFileDescriptor, FILE_TYPE_TAG};
pub use digest::{sha256_bytes, sha256_file, HASH_PREFIX_LEN};
pub use error::{Error, Result};
pub use filename::{is_valid_filename, to_forward_slash_path, wb_filename};
pub use kind::MediaKind;
pub use options::{BindOptions, FilenameCheck};
pub use types::{ArtifactId, ContentHash, RunId};
