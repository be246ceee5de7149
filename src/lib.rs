//! # mediabind
//!
//! Binds media files (images, audio, video, HTML, 3D objects) to the two
//! containers an experiment tracker writes into: a run's working directory
//! and a content-addressed artifact.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mediabind::prelude::*;
//!
//! let run = LocalRun::create(Path::new("./tracking"))?;
//!
//! // Stage bytes, then bind them into the run tree
//! let mut image = Media::<Image>::from_bytes(&png_bytes, "png")?;
//! image.bind_to_run(&run, "samples", 0, None)?;
//! let row = serde_json::to_value(image.serialize_for_run(&run)?)?;
//!
//! // Add the same file to an artifact
//! let artifact = LocalArtifact::create("samples", "./artifacts/samples")?;
//! let entry = image.serialize_for_artifact(&artifact)?;
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Attach** - record the backing file and hash it: [`Media::from_path`],
//!    [`Media::from_bytes`], [`Media::from_reference`]
//! 2. **Bind** - relocate into a run: [`Media::bind_to_run`]
//! 3. **Serialize** - describe for the run ([`Media::serialize_for_run`]) or
//!    add to any number of artifacts ([`Media::serialize_for_artifact`])
//! 4. **Reconstruct** - rebuild from an artifact descriptor:
//!    [`Media::reconstruct`]
//!
//! ## Crates
//!
//! - `mediabind-core` - hashes, descriptors, filename rules, errors
//! - `mediabind-staging` - process-wide staging area for raw bytes
//! - `mediabind-store` - run/artifact traits, local implementations, bundles

#![warn(missing_docs)]

pub mod kinds;
mod media;
mod types;

pub mod prelude;

pub use kinds::{Audio, Html, Image, Object3D, Video};
pub use media::{captions, ArtifactLink, Media};
pub use types::*;

/// Process-wide staging area
pub use mediabind_staging as staging;

/// Bundle export and import of finalized artifacts
pub use mediabind_store::bundle;
