//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for league data. Each line is one JSON
//! object. Readers are lenient: a malformed line is logged and skipped so a
//! single bad row never hides a whole season.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};

/// Entity types stored per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonEntity {
    Team,
    Game,
}

impl SeasonEntity {
    pub fn filename(&self) -> &'static str {
        match self {
            SeasonEntity::Team => "teams.jsonl",
            SeasonEntity::Game => "games.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for a per-season entity file.
    pub fn for_season(config: &StorageConfig, entity: SeasonEntity, season: u32) -> Self {
        Self::new(config.season_dir(season).join(entity.filename()))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append entities to the file.
    pub fn append_batch(&self, entities: &[T]) -> Result<usize, StorageError> {
        if entities.is_empty() {
            return Ok(0);
        }
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let count = write_lines(BufWriter::new(file), entities)?;

        info!("Appended {} entities to {:?}", count, self.path);
        Ok(count)
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let count = write_lines(BufWriter::new(file), entities)?;

        info!("Wrote {} entities to {:?}", count, self.path);
        Ok(count)
    }
}

fn write_lines<T: Serialize, W: Write>(mut writer: W, entities: &[T]) -> Result<usize, StorageError> {
    for entity in entities {
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
    }
    writer.flush()?;
    Ok(entities.len())
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a per-season entity file.
    pub fn for_season(config: &StorageConfig, entity: SeasonEntity, season: u32) -> Self {
        Self::new(config.season_dir(season).join(entity.filename()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entities. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Find all season directories, oldest first.
pub fn list_seasons(config: &StorageConfig) -> Result<Vec<u32>, StorageError> {
    let dir = config.normalized_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut seasons = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        match name.to_str().and_then(parse_season_dir) {
            Some(season) => seasons.push(season),
            None => debug!("Ignoring non-season directory {:?}", name),
        }
    }

    seasons.sort_unstable();
    Ok(seasons)
}

fn parse_season_dir(name: &str) -> Option<u32> {
    name.strip_prefix("season-")?.parse().ok()
}
