//! Filesystem data lake and the fact-store contract.
//!
//! Layout under the data directory:
//! - `normalized/machines.jsonl` and `normalized/venues.jsonl`
//! - `normalized/season-<n>/teams.jsonl` with rosters
//! - `normalized/season-<n>/games.jsonl` with one row per player per game

mod facts;
mod jsonl;
mod jsonl_store;
mod league;

pub use facts::FactStore;
pub use jsonl::{list_seasons, JsonlReader, JsonlWriter, SeasonEntity};
pub use jsonl_store::{ImportSummary, JsonlFactStore};
pub use league::LeagueData;

#[cfg(test)]
pub(crate) use jsonl_store::fixtures::write_lake;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }

    pub fn season_dir(&self, season: u32) -> PathBuf {
        self.normalized_dir().join(format!("season-{}", season))
    }

    pub fn machines_path(&self) -> PathBuf {
        self.normalized_dir().join("machines.jsonl")
    }

    pub fn venues_path(&self) -> PathBuf {
        self.normalized_dir().join("venues.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
