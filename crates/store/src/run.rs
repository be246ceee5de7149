//! Local filesystem run

use crate::traits::Run;
use mediabind_core::RunId;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A run whose file tree lives in a local directory
///
/// Files reported through [`Run::on_new_tracked_file`] are recorded in the
/// order they arrive.
#[derive(Debug)]
pub struct LocalRun {
    run_id: RunId,
    directory: PathBuf,
    tracked: Mutex<Vec<String>>,
}

impl LocalRun {
    /// Create a new run under `base_path/runs/<run_id>/files`
    pub fn create(base_path: &Path) -> std::io::Result<Self> {
        let run_id = RunId::new();
        let directory = base_path
            .join("runs")
            .join(run_id.to_string())
            .join("files");
        fs::create_dir_all(&directory)?;

        info!("Created run {} at {}", run_id, directory.display());

        Ok(Self::with_directory(run_id, directory))
    }

    /// Wrap an existing directory
    pub fn with_directory(run_id: RunId, directory: impl Into<PathBuf>) -> Self {
        LocalRun {
            run_id,
            directory: directory.into(),
            tracked: Mutex::new(Vec::new()),
        }
    }

    /// Files reported so far, relative to the run directory
    pub fn tracked_files(&self) -> Vec<String> {
        self.tracked.lock().clone()
    }
}

impl Run for LocalRun {
    fn id(&self) -> RunId {
        self.run_id
    }

    fn directory(&self) -> &Path {
        &self.directory
    }

    fn on_new_tracked_file(&self, relative_path: &str) {
        debug!("Run {} tracking {}", self.run_id, relative_path);
        self.tracked.lock().push(relative_path.to_string());
    }
}
