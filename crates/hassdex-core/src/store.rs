// ── Snapshot store ──
//
// Two files on disk: the current snapshot and one backup slot. A single
// writer is assumed; there is no locking.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::Snapshot;

/// The current/previous snapshot file pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStore {
    current: PathBuf,
    previous: PathBuf,
}

impl SnapshotStore {
    pub fn new(current: impl Into<PathBuf>, previous: impl Into<PathBuf>) -> Self {
        Self {
            current: current.into(),
            previous: previous.into(),
        }
    }

    pub fn current_path(&self) -> &Path {
        &self.current
    }

    pub fn previous_path(&self) -> &Path {
        &self.previous
    }

    /// Read and decode one snapshot file.
    pub fn load(path: &Path) -> Result<Snapshot, CoreError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::SnapshotMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(CoreError::io(path, e)),
        };
        serde_json::from_str(&raw).map_err(|e| CoreError::Snapshot {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn load_current(&self) -> Result<Snapshot, CoreError> {
        Self::load(&self.current)
    }

    /// The snapshot a new run is diffed against.
    ///
    /// That is the file about to be rotated out (the current slot); when it
    /// does not exist the backup slot stands in. `None` on a first run.
    pub fn load_prior(&self) -> Result<Option<Snapshot>, CoreError> {
        for path in [&self.current, &self.previous] {
            match Self::load(path) {
                Ok(snapshot) => {
                    debug!(path = %path.display(), "loaded prior snapshot");
                    return Ok(Some(snapshot));
                }
                Err(CoreError::SnapshotMissing { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Move the current file into the backup slot, then write `snapshot`
    /// as the new current file.
    pub fn rotate_and_write(&self, snapshot: &Snapshot) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| CoreError::Snapshot {
            path: self.current.clone(),
            reason: e.to_string(),
        })?;

        for path in [&self.current, &self.previous] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
            }
        }

        if self.current.exists() {
            std::fs::rename(&self.current, &self.previous)
                .map_err(|e| CoreError::io(&self.previous, e))?;
            debug!(
                from = %self.current.display(),
                to = %self.previous.display(),
                "rotated snapshot"
            );
        }

        std::fs::write(&self.current, json).map_err(|e| CoreError::io(&self.current, e))?;
        info!(path = %self.current.display(), "snapshot written");
        Ok(())
    }
}
