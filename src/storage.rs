//! Durable storage for the timer collection
//!
//! The whole collection is written to a single JSON file after every
//! mutation, and read back once at startup. The record keeps the
//! `{ "timers": [...] }` envelope of the web client this server replaces,
//! so existing records load unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::Timer;

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed timer record: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk envelope around the timer sequence.
#[derive(Debug, Serialize, Deserialize)]
struct TimerRecord {
    timers: Vec<Timer>,
}

/// Handle to the single timer record on disk.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Create a storage handle for the given record path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The record path this handle reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default record location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kitchen-timer")
            .join("timers.json")
    }

    /// Write the full collection to disk, replacing the previous record.
    pub fn save(&self, timers: &[Timer]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let record = TimerRecord {
            timers: timers.to_vec(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Read the collection back from disk.
    ///
    /// A missing file comes back as `StorageError::Io` with `NotFound` and
    /// malformed content as `StorageError::Parse`; the startup routine treats
    /// either as "no saved timers" rather than a fatal error.
    pub fn load(&self) -> Result<Vec<Timer>, StorageError> {
        let content = fs::read_to_string(&self.path)?;
        let record: TimerRecord = serde_json::from_str(&content)?;
        Ok(record.timers)
    }
}
