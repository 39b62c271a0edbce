//! Transient audio artifact owned by a single pipeline run.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Recording audio staged on local disk for the duration of one run.
///
/// The file is removed by [`AudioArtifact::cleanup`] on every exit path;
/// cleanup is idempotent and safe when the file is already gone. `Drop`
/// invokes it as a last resort so no exit path can leak the file.
pub struct AudioArtifact {
    path: PathBuf,
    removed: bool,
}

impl AudioArtifact {
    pub fn create(recording_sid: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("voicebrief-{recording_sid}-"))
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(bytes)?;

        // Deletion is managed by this guard, not by tempfile's own Drop.
        let (_, path) = file.keep().map_err(|e| e.error)?;

        debug!("Staged {} bytes of audio at {:?}", bytes.len(), path);
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cleanup(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed audio artifact {:?}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Audio artifact {:?} already removed", self.path);
            }
            Err(e) => warn!("Failed to remove audio artifact {:?}: {}", self.path, e),
        }
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        self.cleanup();
    }
}
