//! Staging area configuration

use std::path::PathBuf;

/// Default directory name prefix of the staging area
pub const DEFAULT_PREFIX: &str = "mediabind-media";

/// Where and how the staging directory is created
#[derive(Debug, Clone)]
pub struct StagingConfig {
    /// Parent directory; the OS temp dir when `None`
    pub parent_dir: Option<PathBuf>,
    /// Directory name prefix
    pub prefix: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        StagingConfig {
            parent_dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl StagingConfig {
    /// Set the directory name prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Create the staging directory under `dir`
    pub fn parent_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parent_dir = Some(dir.into());
        self
    }
}
