//! Convenient imports for mediabind.
//!
//! ```ignore
//! use mediabind::prelude::*;
//!
//! let mut audio = Media::<Audio>::from_path("clip.wav")?;
//! audio.bind_to_run(&run, "clips", 10, None)?;
//! ```

// Media objects
pub use crate::media::{captions, Media};

// Kinds
pub use crate::kinds::{Audio, Html, Image, Object3D, Video};

// Error handling
pub use crate::types::{Error, Result};

// Containers
pub use crate::types::{Artifact, LocalArtifact, LocalRun, Run};

// Descriptors
pub use crate::types::{ArtifactDescriptor, RunFileDescriptor};

// Options
pub use crate::types::{BindOptions, MediaKind};
