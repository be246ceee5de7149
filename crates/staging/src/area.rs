//! A single staging directory

use crate::config::StagingConfig;
use mediabind_core::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Private directory holding staged media files
///
/// The directory and everything in it is removed when the area is closed or
/// dropped.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a staging directory according to `config`
    pub fn new(config: &StagingConfig) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&config.prefix);
        let dir = match &config.parent_dir {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        Ok(StagingArea { dir })
    }

    /// Create a staging directory under `parent` with default settings
    pub fn new_in(parent: impl Into<PathBuf>) -> Result<Self> {
        Self::new(&StagingConfig::default().parent_dir(parent))
    }

    /// Directory path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh, unused file path with the given extension
    ///
    /// `extension` may be given with or without the leading dot.
    pub fn unique_path(&self, extension: &str) -> PathBuf {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let ext = extension.trim_start_matches('.');
        if ext.is_empty() {
            self.dir.path().join(id)
        } else {
            self.dir.path().join(format!("{}.{}", id, ext))
        }
    }

    /// Write `data` to a fresh file and return its path
    pub fn stage_bytes(&self, data: &[u8], extension: &str) -> Result<PathBuf> {
        let path = self.unique_path(extension);
        fs::write(&path, data)?;
        debug!("Staged {} bytes at {}", data.len(), path.display());
        Ok(path)
    }

    /// Remove the directory, reporting removal errors
    pub fn close(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}
