//! Progress persistence
//!
//! The store itself is purely in-memory. Durable storage is layered on top by
//! taking a [`StoreSnapshot`] and handing it to a [`SnapshotRepository`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::model::{AnalyticsSummary, ProgressRecord};

/// Everything the store knows, in a serializable form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Course records per user, in first-touched order
    pub users: BTreeMap<String, Vec<ProgressRecord>>,

    /// Last computed analytics per user
    #[serde(default)]
    pub analytics: BTreeMap<String, AnalyticsSummary>,
}

/// Somewhere a snapshot can be kept between runs
pub trait SnapshotRepository {
    /// Load the saved snapshot, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<StoreSnapshot>>;

    /// Replace the saved snapshot
    fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}

/// Snapshot stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Use the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read progress from {:?}", self.path))?;
        let snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse progress in {:?}", self.path))?;

        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(snapshot)
            .with_context(|| "Failed to serialize progress")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write progress to {:?}", self.path))?;

        tracing::debug!("Saved progress for {} users to {:?}", snapshot.users.len(), self.path);
        Ok(())
    }
}
