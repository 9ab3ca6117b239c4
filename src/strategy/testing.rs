//! In-memory fact store for strategy tests.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{
    LeagueBaseline, Machine, MachineFacts, PlayerMachineFacts, PlayerScores, PlayerSummary,
    PlayerTeam, TeamSummary, VenueSummary, P50,
};
use crate::storage::{FactStore, StorageError};

type Scoped = (String, Option<String>);

/// Canned answers keyed by query arguments. Unknown keys answer empty.
#[derive(Default)]
pub(crate) struct MockStore {
    team_facts: HashMap<Scoped, Vec<MachineFacts>>,
    player_facts: HashMap<Scoped, Vec<PlayerMachineFacts>>,
    baseline: HashMap<String, f64>,
    venues: HashMap<String, HashSet<String>>,
    names: HashMap<String, String>,
    teams_of: HashMap<String, PlayerTeam>,
    fail_on: Option<&'static str>,
    delay: Option<Duration>,
}

/// Facts for one machine from `(player, scores)` pairs.
pub(crate) fn machine(key: &str, players: &[(&str, &[i64])]) -> MachineFacts {
    MachineFacts {
        machine_key: key.to_string(),
        players: players
            .iter()
            .map(|(player, scores)| PlayerScores {
                player: player.to_string(),
                scores: scores.to_vec(),
            })
            .collect(),
    }
}

pub(crate) fn player_machine(key: &str, scores: &[i64]) -> PlayerMachineFacts {
    PlayerMachineFacts {
        machine_key: key.to_string(),
        scores: scores.to_vec(),
    }
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn team(mut self, team: &str, venue: Option<&str>, facts: Vec<MachineFacts>) -> Self {
        self.team_facts
            .insert((team.to_string(), venue.map(str::to_string)), facts);
        self
    }

    pub(crate) fn player(
        mut self,
        player: &str,
        venue: Option<&str>,
        facts: Vec<PlayerMachineFacts>,
    ) -> Self {
        self.player_facts
            .insert((player.to_string(), venue.map(str::to_string)), facts);
        self
    }

    pub(crate) fn baseline(mut self, machine: &str, value: f64) -> Self {
        self.baseline.insert(machine.to_string(), value);
        self
    }

    pub(crate) fn venue(mut self, venue: &str, machines: &[&str]) -> Self {
        self.venues.insert(
            venue.to_string(),
            machines.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub(crate) fn name(mut self, machine: &str, name: &str) -> Self {
        self.names.insert(machine.to_string(), name.to_string());
        self
    }

    pub(crate) fn team_of(mut self, player: &str, key: &str, name: &str) -> Self {
        self.teams_of.insert(
            player.to_string(),
            PlayerTeam {
                key: key.to_string(),
                name: name.to_string(),
            },
        );
        self
    }

    /// Make one query fail. Names match the trait method.
    pub(crate) fn fail_on(mut self, query: &'static str) -> Self {
        self.fail_on = Some(query);
        self
    }

    /// Delay every fact query.
    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn enter(&self, query: &str) -> Result<(), StorageError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on == Some(query) {
            return Err(StorageError::Unavailable(format!("{} failed", query)));
        }
        Ok(())
    }
}

fn scoped(key: &str, venue: Option<&str>) -> Scoped {
    (key.to_string(), venue.map(str::to_string))
}

#[async_trait]
impl FactStore for MockStore {
    async fn roster_scoped_facts(
        &self,
        team: &str,
        venue: Option<&str>,
    ) -> Result<Vec<MachineFacts>, StorageError> {
        self.enter("roster_scoped_facts").await?;
        Ok(self
            .team_facts
            .get(&scoped(team, venue))
            .cloned()
            .unwrap_or_default())
    }

    async fn single_player_facts(
        &self,
        player: &str,
        venue: Option<&str>,
    ) -> Result<Vec<PlayerMachineFacts>, StorageError> {
        self.enter("single_player_facts").await?;
        Ok(self
            .player_facts
            .get(&scoped(player, venue))
            .cloned()
            .unwrap_or_default())
    }

    async fn league_baseline(&self, percentile: f64) -> Result<LeagueBaseline, StorageError> {
        self.enter("league_baseline").await?;
        assert_eq!(percentile, P50);
        Ok(LeagueBaseline::new(percentile, self.baseline.clone()))
    }

    async fn machines_at_venue(&self, venue: &str) -> Result<HashSet<String>, StorageError> {
        self.enter("machines_at_venue").await?;
        Ok(self.venues.get(venue).cloned().unwrap_or_default())
    }

    async fn machine_names(&self) -> Result<HashMap<String, String>, StorageError> {
        self.enter("machine_names").await?;
        Ok(self.names.clone())
    }

    async fn current_team_of(&self, player: &str) -> Result<Option<PlayerTeam>, StorageError> {
        self.enter("current_team_of").await?;
        Ok(self.teams_of.get(player).cloned())
    }

    async fn list_teams(&self, _search: &str) -> Result<Vec<TeamSummary>, StorageError> {
        Ok(Vec::new())
    }

    async fn list_venues(&self, _search: &str) -> Result<Vec<VenueSummary>, StorageError> {
        Ok(Vec::new())
    }

    async fn list_machines(&self, _search: &str) -> Result<Vec<Machine>, StorageError> {
        Ok(Vec::new())
    }

    async fn list_players(&self, _search: &str) -> Result<Vec<PlayerSummary>, StorageError> {
        Ok(Vec::new())
    }
}
