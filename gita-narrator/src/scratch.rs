//! Transient files that clean up after themselves.

use std::path::{Path, PathBuf};

/// A file path owned for the duration of one component call.
///
/// The file is removed when the guard drops. A path that was never
/// written, or was renamed away, is left alone.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed {}", self.path.display()),
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
