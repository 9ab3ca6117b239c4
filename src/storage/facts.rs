//! The read-only query contract the strategies consume.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::models::{
    LeagueBaseline, Machine, MachineFacts, PlayerMachineFacts, PlayerSummary, PlayerTeam, TeamSummary,
    VenueSummary,
};

use super::StorageError;

/// Read queries over league game facts.
///
/// Team queries are always scoped to the team's current roster: players on
/// the roster in the latest season the team key appears, with their scores
/// from every season and every team they have played for.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Scores of the team's current roster, grouped by machine then player.
    /// `venue` restricts to games played at that venue.
    async fn roster_scoped_facts(
        &self,
        team: &str,
        venue: Option<&str>,
    ) -> Result<Vec<MachineFacts>, StorageError>;

    /// One player's scores grouped by machine.
    async fn single_player_facts(
        &self,
        player: &str,
        venue: Option<&str>,
    ) -> Result<Vec<PlayerMachineFacts>, StorageError>;

    /// Per-machine percentile over every current roster player in the league.
    async fn league_baseline(&self, percentile: f64) -> Result<LeagueBaseline, StorageError>;

    /// Machine keys currently at a venue. Empty for an unknown venue.
    async fn machines_at_venue(&self, venue: &str) -> Result<HashSet<String>, StorageError>;

    /// Machine key to display name.
    async fn machine_names(&self) -> Result<HashMap<String, String>, StorageError>;

    /// The player's current team, if they are on a current roster.
    async fn current_team_of(&self, player: &str) -> Result<Option<PlayerTeam>, StorageError>;

    /// Teams in the latest season, optionally filtered by key or name.
    async fn list_teams(&self, search: &str) -> Result<Vec<TeamSummary>, StorageError>;

    /// Venues, optionally filtered by key or name.
    async fn list_venues(&self, search: &str) -> Result<Vec<VenueSummary>, StorageError>;

    /// Machines that have been played, optionally filtered by key or name.
    async fn list_machines(&self, search: &str) -> Result<Vec<Machine>, StorageError>;

    /// Latest-season roster players with their team, optionally filtered by
    /// player name, team key or team name.
    async fn list_players(&self, search: &str) -> Result<Vec<PlayerSummary>, StorageError>;
}
