//! Staging area for media files
//!
//! Raw media bytes are written here first so they can be hashed before being
//! moved into a run directory or added to an artifact. Files staged here are
//! owned by the media object that staged them, so binding may move them
//! instead of copying.
//!
//! ## Lifecycle
//!
//! The process-wide area is an explicit singleton whose directory lives as
//! long as someone holds it:
//!
//! 1. [`configure`] (optional, before first use)
//! 2. [`global`] creates the directory on first use and returns a shared
//!    handle. The singleton itself only keeps a weak reference.
//! 3. The directory is removed when the last handle is dropped. Media
//!    objects hold a handle for as long as their file is staged, so a
//!    process that drops its media before exiting leaves nothing behind.
//! 4. [`shutdown`] detaches the current area; a later [`global`] starts a
//!    fresh one.
//!
//! Concurrent staging is safe as long as file names are unique, which
//! [`StagingArea::unique_path`] guarantees.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod area;
mod config;

pub use area::StagingArea;
pub use config::StagingConfig;

use mediabind_core::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

struct GlobalStaging {
    config: StagingConfig,
    area: Weak<StagingArea>,
}

static GLOBAL: Lazy<Mutex<GlobalStaging>> = Lazy::new(|| {
    Mutex::new(GlobalStaging {
        config: StagingConfig::default(),
        area: Weak::new(),
    })
});

/// Set the configuration used when the global area is created.
///
/// Fails with `InvalidArgument` while an area is alive; drop every handle or
/// call [`shutdown`] first to reconfigure.
pub fn configure(config: StagingConfig) -> Result<()> {
    let mut global = GLOBAL.lock();
    if global.area.strong_count() > 0 {
        return Err(Error::InvalidArgument(
            "staging area already initialized; shut it down before reconfiguring".to_string(),
        ));
    }
    global.config = config;
    Ok(())
}

/// The process-wide staging area, created on first use.
///
/// The returned handle keeps the directory alive.
pub fn global() -> Result<Arc<StagingArea>> {
    let mut global = GLOBAL.lock();
    if let Some(area) = global.area.upgrade() {
        return Ok(area);
    }
    let area = Arc::new(StagingArea::new(&global.config)?);
    info!("Created media staging area at {}", area.path().display());
    global.area = Arc::downgrade(&area);
    Ok(area)
}

/// Whether a global area is currently alive.
pub fn is_initialized() -> bool {
    GLOBAL.lock().area.strong_count() > 0
}

/// Detach the global staging area.
///
/// The next [`global`] creates a fresh directory. The detached directory is
/// removed once its last handle is dropped, which is immediately when none
/// is alive. Calling this when no area exists is a no-op.
pub fn shutdown() {
    let detached = std::mem::take(&mut GLOBAL.lock().area);
    if let Some(area) = detached.upgrade() {
        debug!(
            "Staging area {} detached, removal deferred to last handle",
            area.path().display()
        );
    }
}
