//! In-memory view of the data lake that answers fact-store queries.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tracing::debug;

use crate::calculate::percentile;
use crate::models::{
    matches_search, GameRecord, LeagueBaseline, Machine, MachineFacts, PlayerMachineFacts,
    PlayerScores, PlayerSummary, PlayerTeam, TeamSeason, TeamSummary, Venue, VenueSummary,
};

use super::{list_seasons, FactStore, JsonlReader, SeasonEntity, StorageConfig, StorageError};

/// Every machine, venue, team season and game record in the lake.
#[derive(Debug, Clone, Default)]
pub struct LeagueData {
    machines: Vec<Machine>,
    venues: Vec<Venue>,
    teams: Vec<TeamSeason>,
    games: Vec<GameRecord>,
}

impl LeagueData {
    /// Build from already-loaded parts. Rows written without an id get one
    /// derived first; duplicate game ids keep the first row.
    pub fn from_parts(
        machines: Vec<Machine>,
        venues: Vec<Venue>,
        teams: Vec<TeamSeason>,
        games: Vec<GameRecord>,
    ) -> Self {
        let total = games.len();
        let mut seen = HashSet::with_capacity(total);
        let games: Vec<GameRecord> = games
            .into_iter()
            .map(GameRecord::ensure_id)
            .filter(|g| seen.insert(g.id.clone()))
            .collect();

        if games.len() < total {
            debug!("Dropped {} duplicate game records", total - games.len());
        }

        Self {
            machines,
            venues,
            teams,
            games,
        }
    }

    /// Read the whole lake from disk.
    pub fn load(config: &StorageConfig) -> Result<Self, StorageError> {
        let machines = JsonlReader::new(config.machines_path()).read_all()?;
        let venues = JsonlReader::new(config.venues_path()).read_all()?;

        let mut teams = Vec::new();
        let mut games = Vec::new();
        for season in list_seasons(config)? {
            teams.extend(JsonlReader::<TeamSeason>::for_season(config, SeasonEntity::Team, season).read_all()?);
            games.extend(JsonlReader::<GameRecord>::for_season(config, SeasonEntity::Game, season).read_all()?);
        }

        let data = Self::from_parts(machines, venues, teams, games);
        debug!(
            "Loaded {} machines, {} venues, {} team seasons, {} games from {:?}",
            data.machines.len(),
            data.venues.len(),
            data.teams.len(),
            data.games.len(),
            config.data_dir
        );
        Ok(data)
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    /// Most recent season that has any team in it.
    pub fn latest_season(&self) -> Option<u32> {
        self.teams.iter().map(|t| t.season).max()
    }

    /// The team as it exists in the latest season its key appears in.
    pub fn current_team(&self, key: &str) -> Option<&TeamSeason> {
        self.teams
            .iter()
            .filter(|t| t.key == key)
            .max_by_key(|t| t.season)
    }

    fn current_season_teams(&self) -> impl Iterator<Item = &TeamSeason> {
        let latest = self.latest_season();
        self.teams.iter().filter(move |t| Some(t.season) == latest)
    }

    fn current_roster(&self, team: &str) -> HashSet<&str> {
        self.current_team(team)
            .map(|t| t.roster.iter().map(|r| r.player.as_str()).collect())
            .unwrap_or_default()
    }

    /// Players on any roster in the latest season.
    fn current_league_players(&self) -> HashSet<&str> {
        self.current_season_teams()
            .flat_map(|t| t.roster.iter().map(|r| r.player.as_str()))
            .collect()
    }

    fn games_at<'a>(&'a self, venue: Option<&'a str>) -> impl Iterator<Item = &'a GameRecord> {
        self.games
            .iter()
            .filter(move |g| venue.map_or(true, |v| g.venue == v))
    }

    /// Current roster scores grouped by machine then player, both sorted by key.
    pub fn roster_scoped_facts(&self, team: &str, venue: Option<&str>) -> Vec<MachineFacts> {
        let roster = self.current_roster(team);
        if roster.is_empty() {
            return Vec::new();
        }

        let mut grouped: BTreeMap<&str, BTreeMap<&str, Vec<i64>>> = BTreeMap::new();
        for game in self
            .games_at(venue)
            .filter(|g| roster.contains(g.player.as_str()))
        {
            grouped
                .entry(game.machine.as_str())
                .or_default()
                .entry(game.player.as_str())
                .or_default()
                .push(game.score);
        }

        grouped
            .into_iter()
            .map(|(machine, players)| MachineFacts {
                machine_key: machine.to_string(),
                players: players
                    .into_iter()
                    .map(|(player, scores)| PlayerScores {
                        player: player.to_string(),
                        scores,
                    })
                    .collect(),
            })
            .collect()
    }

    /// One player's scores grouped by machine, sorted by machine key.
    pub fn single_player_facts(&self, player: &str, venue: Option<&str>) -> Vec<PlayerMachineFacts> {
        let mut grouped: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
        for game in self.games_at(venue).filter(|g| g.player == player) {
            grouped
                .entry(game.machine.as_str())
                .or_default()
                .push(game.score);
        }

        grouped
            .into_iter()
            .map(|(machine, scores)| PlayerMachineFacts {
                machine_key: machine.to_string(),
                scores,
            })
            .collect()
    }

    pub fn league_baseline(&self, p: f64) -> LeagueBaseline {
        let players = self.current_league_players();

        let mut pooled: HashMap<&str, Vec<i64>> = HashMap::new();
        for game in self
            .games
            .iter()
            .filter(|g| players.contains(g.player.as_str()))
        {
            pooled.entry(game.machine.as_str()).or_default().push(game.score);
        }

        let values = pooled
            .into_iter()
            .filter_map(|(machine, scores)| {
                percentile(&scores, p).map(|value| (machine.to_string(), value))
            })
            .collect();

        LeagueBaseline::new(p, values)
    }

    /// Machines at a venue, taken from the latest season that lists it.
    pub fn machines_at_venue(&self, venue: &str) -> HashSet<String> {
        self.venues
            .iter()
            .filter(|v| v.key == venue)
            .max_by_key(|v| v.season)
            .map(|v| v.machines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn machine_names(&self) -> HashMap<String, String> {
        self.machines
            .iter()
            .map(|m| (m.key.clone(), m.name.clone()))
            .collect()
    }

    pub fn current_team_of(&self, player: &str) -> Option<PlayerTeam> {
        self.current_season_teams()
            .find(|t| t.has_player(player))
            .map(|t| PlayerTeam {
                key: t.key.clone(),
                name: t.name.clone(),
            })
    }

    /// Latest-season teams, sorted by name.
    pub fn list_teams(&self, search: &str) -> Vec<TeamSummary> {
        let mut teams: Vec<TeamSummary> = self
            .current_season_teams()
            .filter(|t| matches_search(&t.key, &t.name, search))
            .map(|t| TeamSummary {
                key: t.key.clone(),
                name: t.name.clone(),
                venue: t.home_venue.clone(),
            })
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }

    /// Venues by key using their latest season's name, sorted by name.
    pub fn list_venues(&self, search: &str) -> Vec<VenueSummary> {
        let mut latest: HashMap<&str, &Venue> = HashMap::new();
        for venue in &self.venues {
            let entry = latest.entry(venue.key.as_str()).or_insert(venue);
            if venue.season > entry.season {
                *entry = venue;
            }
        }

        let mut venues: Vec<VenueSummary> = latest
            .into_values()
            .filter(|v| matches_search(&v.key, &v.name, search))
            .map(|v| VenueSummary {
                key: v.key.clone(),
                name: v.name.clone(),
            })
            .collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name));
        venues
    }

    /// Latest-season roster players with their team, sorted by name then team.
    /// The search matches the player name, team key or team name.
    pub fn list_players(&self, search: &str) -> Vec<PlayerSummary> {
        let mut players: Vec<PlayerSummary> = self
            .current_season_teams()
            .flat_map(|t| {
                let team_matches = matches_search(&t.key, &t.name, search);
                t.roster
                    .iter()
                    .filter(move |r| team_matches || matches_search(&r.player, "", search))
                    .map(move |r| PlayerSummary {
                        name: r.player.clone(),
                        team_key: t.key.clone(),
                        team: t.name.clone(),
                    })
            })
            .collect();
        players.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.team_key.cmp(&b.team_key)));
        players
    }

    /// Machines with at least one recorded game, sorted by name.
    pub fn list_machines(&self, search: &str) -> Vec<Machine> {
        let played: HashSet<&str> = self.games.iter().map(|g| g.machine.as_str()).collect();

        let mut machines: Vec<Machine> = self
            .machines
            .iter()
            .filter(|m| played.contains(m.key.as_str()))
            .filter(|m| matches_search(&m.key, &m.name, search))
            .cloned()
            .collect();
        machines.sort_by(|a, b| a.name.cmp(&b.name));
        machines
    }
}

#[async_trait]
impl FactStore for LeagueData {
    async fn roster_scoped_facts(
        &self,
        team: &str,
        venue: Option<&str>,
    ) -> Result<Vec<MachineFacts>, StorageError> {
        Ok(LeagueData::roster_scoped_facts(self, team, venue))
    }

    async fn single_player_facts(
        &self,
        player: &str,
        venue: Option<&str>,
    ) -> Result<Vec<PlayerMachineFacts>, StorageError> {
        Ok(LeagueData::single_player_facts(self, player, venue))
    }

    async fn league_baseline(&self, percentile: f64) -> Result<LeagueBaseline, StorageError> {
        Ok(LeagueData::league_baseline(self, percentile))
    }

    async fn machines_at_venue(&self, venue: &str) -> Result<HashSet<String>, StorageError> {
        Ok(LeagueData::machines_at_venue(self, venue))
    }

    async fn machine_names(&self) -> Result<HashMap<String, String>, StorageError> {
        Ok(LeagueData::machine_names(self))
    }

    async fn current_team_of(&self, player: &str) -> Result<Option<PlayerTeam>, StorageError> {
        Ok(LeagueData::current_team_of(self, player))
    }

    async fn list_teams(&self, search: &str) -> Result<Vec<TeamSummary>, StorageError> {
        Ok(LeagueData::list_teams(self, search))
    }

    async fn list_venues(&self, search: &str) -> Result<Vec<VenueSummary>, StorageError> {
        Ok(LeagueData::list_venues(self, search))
    }

    async fn list_machines(&self, search: &str) -> Result<Vec<Machine>, StorageError> {
        Ok(LeagueData::list_machines(self, search))
    }

    async fn list_players(&self, search: &str) -> Result<Vec<PlayerSummary>, StorageError> {
        Ok(LeagueData::list_players(self, search))
    }
}
