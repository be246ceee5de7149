//! Artifact bundles - portable archives of finalized artifacts
//!
//! A bundle is a zstd-compressed tar archive:
//!
//! ```text
//! <name>.artifact.tar.zst
//! └── artifact/
//!     ├── BUNDLE.json      # Format version, per-file checksums
//!     ├── MANIFEST.json    # Artifact manifest (entries by name)
//!     └── files/
//!         └── <entry name> # Content of every non-reference entry
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! artifact.finalize()?;
//! let info = ArtifactBundleWriter::export(&artifact, Path::new("./samples.artifact.tar.zst"))?;
//!
//! let verify = ArtifactBundleReader::validate(Path::new("./samples.artifact.tar.zst"))?;
//! let restored = ArtifactBundleReader::unpack(Path::new("./samples.artifact.tar.zst"), dest)?;
//! ```
//!
//! Only finalized artifacts can be exported. Exporting the same artifact
//! twice produces identical bundles.

mod reader;
mod types;
mod writer;

pub use reader::ArtifactBundleReader;
pub use types::{
    paths, xxh3_hex, BundleExportInfo, BundleHeader, BundleVerifyInfo, BUNDLE_EXTENSION,
    BUNDLE_FORMAT_VERSION,
};
pub use writer::ArtifactBundleWriter;
