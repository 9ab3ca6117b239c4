//! Fact store backed by the JSONL data lake.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::{
    GameId, GameRecord, LeagueBaseline, Machine, MachineFacts, PlayerMachineFacts, PlayerSummary,
    PlayerTeam, TeamSummary, VenueSummary,
};

use super::{FactStore, JsonlReader, JsonlWriter, LeagueData, SeasonEntity, StorageConfig, StorageError};

/// Reads the lake from disk on every query, so new seasons and imports are
/// visible without a restart. Pair with `cache::CachedStore` for reference
/// data that rarely changes.
#[derive(Debug, Clone)]
pub struct JsonlFactStore {
    config: StorageConfig,
}

/// Outcome of importing game records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub read: usize,
    pub imported: usize,
    pub duplicates: usize,
    pub seasons: Vec<u32>,
}

impl JsonlFactStore {
    /// Open a store over an existing data directory.
    pub fn open(config: StorageConfig) -> Result<Self, StorageError> {
        if !config.data_dir.exists() {
            return Err(StorageError::PathNotFound(config.data_dir));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    async fn data(&self) -> Result<LeagueData, StorageError> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || LeagueData::load(&config))
            .await
            .map_err(|e| StorageError::Unavailable(format!("load task failed: {}", e)))?
    }

    /// Append game records to their season files, skipping any whose id is
    /// already stored. Records without an id get one derived.
    pub fn import_games(&self, games: Vec<GameRecord>) -> Result<ImportSummary, StorageError> {
        let mut summary = ImportSummary {
            read: games.len(),
            ..Default::default()
        };

        let mut by_season: BTreeMap<u32, Vec<GameRecord>> = BTreeMap::new();
        for game in games {
            let game = game.ensure_id();
            by_season.entry(game.season).or_default().push(game);
        }

        for (season, games) in by_season {
            let reader: JsonlReader<GameRecord> =
                JsonlReader::for_season(&self.config, SeasonEntity::Game, season);
            let mut known: HashSet<GameId> =
                reader.read_all()?.into_iter().map(|g| g.ensure_id().id).collect();

            let fresh: Vec<GameRecord> = games
                .into_iter()
                .filter(|g| known.insert(g.id.clone()))
                .collect();

            debug!("Season {}: {} new game records", season, fresh.len());
            let written =
                JsonlWriter::for_season(&self.config, SeasonEntity::Game, season).append_batch(&fresh)?;
            summary.imported += written;
            if written > 0 {
                summary.seasons.push(season);
            }
        }

        summary.duplicates = summary.read - summary.imported;
        info!(
            "Imported {} of {} game records ({} duplicates)",
            summary.imported, summary.read, summary.duplicates
        );
        Ok(summary)
    }
}

#[async_trait]
impl FactStore for JsonlFactStore {
    async fn roster_scoped_facts(
        &self,
        team: &str,
        venue: Option<&str>,
    ) -> Result<Vec<MachineFacts>, StorageError> {
        Ok(self.data().await?.roster_scoped_facts(team, venue))
    }

    async fn single_player_facts(
        &self,
        player: &str,
        venue: Option<&str>,
    ) -> Result<Vec<PlayerMachineFacts>, StorageError> {
        Ok(self.data().await?.single_player_facts(player, venue))
    }

    async fn league_baseline(&self, percentile: f64) -> Result<LeagueBaseline, StorageError> {
        Ok(self.data().await?.league_baseline(percentile))
    }

    async fn machines_at_venue(&self, venue: &str) -> Result<HashSet<String>, StorageError> {
        Ok(self.data().await?.machines_at_venue(venue))
    }

    async fn machine_names(&self) -> Result<HashMap<String, String>, StorageError> {
        Ok(self.data().await?.machine_names())
    }

    async fn current_team_of(&self, player: &str) -> Result<Option<PlayerTeam>, StorageError> {
        Ok(self.data().await?.current_team_of(player))
    }

    async fn list_teams(&self, search: &str) -> Result<Vec<TeamSummary>, StorageError> {
        Ok(self.data().await?.list_teams(search))
    }

    async fn list_venues(&self, search: &str) -> Result<Vec<VenueSummary>, StorageError> {
        Ok(self.data().await?.list_venues(search))
    }

    async fn list_machines(&self, search: &str) -> Result<Vec<Machine>, StorageError> {
        Ok(self.data().await?.list_machines(search))
    }

    async fn list_players(&self, search: &str) -> Result<Vec<PlayerSummary>, StorageError> {
        Ok(self.data().await?.list_players(search))
    }
}
