//! JSON snapshot file for the in-memory repository.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::RepositoryError;
use super::memory::{LineRow, SectionRow, StationRow};

/// Everything the in-memory repository holds.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct Snapshot {
    pub next_id: u64,
    pub stations: Vec<StationRow>,
    pub lines: Vec<LineRow>,
    pub sections: Vec<SectionRow>,
}

/// Location of the snapshot file on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot.
    ///
    /// Returns `None` if the file does not exist. A file that exists but cannot
    /// be parsed is an error, never an empty network.
    pub(super) fn load(&self) -> Result<Option<Snapshot>, RepositoryError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RepositoryError::Snapshot {
                    message: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| RepositoryError::Snapshot {
                message: format!("failed to parse {}: {}", self.path.display(), e),
            })
    }

    /// Write the snapshot.
    ///
    /// The new contents go to a sibling temporary file that is then renamed
    /// over the old one, so readers never see a half-written snapshot.
    /// Creates parent directories if they don't exist.
    pub(super) fn save(&self, snapshot: &Snapshot) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| RepositoryError::Snapshot {
                message: format!("failed to create snapshot directory: {}", e),
            })?;
        }

        let json = serde_json::to_string_pretty(snapshot).map_err(|e| RepositoryError::Snapshot {
            message: format!("failed to serialize snapshot: {}", e),
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).map_err(|e| RepositoryError::Snapshot {
            message: format!("failed to write snapshot file: {}", e),
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| RepositoryError::Snapshot {
            message: format!("failed to replace snapshot file: {}", e),
        })?;

        Ok(())
    }
}
