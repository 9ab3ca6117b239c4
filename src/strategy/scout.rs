//! Team scouting: where a team is strong and weak.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::calculate::{aggregate_team, relative_strength, strength_summary};
use crate::models::{
    machine_name, LeagueBaseline, LikelyPlayer, MachineFacts, StrengthSummary, TeamMachineStats,
    P50,
};
use crate::storage::FactStore;

use super::{strength_entry, venue_machines, QueryContext, StrategyError};

/// Options for [`scout`].
#[derive(Debug, Clone, Default)]
pub struct ScoutOptions {
    /// Scope to machines at this venue.
    pub venue: Option<String>,
}

impl ScoutOptions {
    pub fn at_venue(venue: impl Into<String>) -> Self {
        Self {
            venue: Some(venue.into()),
        }
    }
}

/// A team's performance on one machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoutMachine {
    pub machine_key: String,
    pub machine_name: String,
    pub games: u32,
    pub p50: f64,
    pub p90: f64,
    pub league_p50: f64,
    /// Percent above (or below) the league P50. Zero without a baseline.
    pub relative_strength: f64,
    pub likely_players: Vec<LikelyPlayer>,
    /// Set on global rows when the team has no games on the machine at the venue.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_venue_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoutResult {
    pub team: String,
    pub venue: Option<String>,
    /// Games played at the venue only. `None` without a venue.
    pub venue_stats: Option<Vec<ScoutMachine>>,
    /// Games played anywhere, restricted to the venue's machines when one is set.
    pub global_stats: Vec<ScoutMachine>,
    pub analysis: StrengthSummary,
}

/// Scout a team across every machine it has played, or across the machines
/// at one venue.
pub async fn scout<S: FactStore + ?Sized>(
    store: &S,
    team: &str,
    options: &ScoutOptions,
) -> Result<ScoutResult, StrategyError> {
    let baseline = store
        .league_baseline(P50)
        .await
        .context("load league baseline")?;
    let names = store.machine_names().await.context("load machine names")?;

    let Some(venue) = options.venue.as_deref() else {
        let facts = team_facts(store, team, None).await?;
        let global_stats = rows(aggregate_team(&facts), &baseline, &names);

        return Ok(ScoutResult {
            team: team.to_string(),
            venue: None,
            venue_stats: None,
            analysis: analyze(&global_stats),
            global_stats,
        });
    };

    let machines = venue_machines(store, venue).await?;
    let venue_facts = at_machines(team_facts(store, team, Some(venue)).await?, &machines);
    let global_facts = at_machines(team_facts(store, team, None).await?, &machines);

    let venue_stats = rows(aggregate_team(&venue_facts), &baseline, &names);
    let played: HashSet<&str> = venue_stats.iter().map(|m| m.machine_key.as_str()).collect();

    let mut global_stats = rows(aggregate_team(&global_facts), &baseline, &names);
    for row in &mut global_stats {
        row.no_venue_data = !played.contains(row.machine_key.as_str());
    }

    Ok(ScoutResult {
        team: team.to_string(),
        venue: Some(venue.to_string()),
        analysis: analyze(&global_stats),
        venue_stats: Some(venue_stats),
        global_stats,
    })
}

async fn team_facts<S: FactStore + ?Sized>(
    store: &S,
    team: &str,
    venue: Option<&str>,
) -> Result<Vec<MachineFacts>, StrategyError> {
    store
        .roster_scoped_facts(team, venue)
        .await
        .with_context(|| format!("load team stats for {}", team))
}

fn at_machines(mut facts: Vec<MachineFacts>, machines: &HashSet<String>) -> Vec<MachineFacts> {
    facts.retain(|f| machines.contains(&f.machine_key));
    facts
}

fn rows(
    stats: Vec<TeamMachineStats>,
    baseline: &LeagueBaseline,
    names: &HashMap<String, String>,
) -> Vec<ScoutMachine> {
    stats
        .into_iter()
        .map(|s| {
            let league_p50 = baseline.get(&s.machine_key);
            ScoutMachine {
                machine_name: machine_name(names, &s.machine_key),
                games: s.stats.games,
                p50: s.stats.p50,
                p90: s.stats.p90,
                league_p50,
                relative_strength: relative_strength(s.stats.p50, league_p50),
                likely_players: s.likely_players,
                no_venue_data: false,
                machine_key: s.machine_key,
            }
        })
        .collect()
}

fn analyze(stats: &[ScoutMachine]) -> StrengthSummary {
    let entries: Vec<_> = stats
        .iter()
        .map(|m| strength_entry(&m.machine_name, m.games, m.relative_strength))
        .collect();
    strength_summary(&entries)
}
