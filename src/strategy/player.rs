//! Single-player profile across machines.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::warn;

use crate::calculate::{relative_strength, strength_summary};
use crate::models::{
    machine_name, LeagueBaseline, Percentiles, PlayerMachineFacts, PlayerTeam, StrengthSummary,
    P50,
};
use crate::storage::FactStore;

use super::{strength_entry, venue_machines, QueryContext, StrategyError};

/// Options for [`player`].
#[derive(Debug, Clone, Default)]
pub struct PlayerOptions {
    pub venue: Option<String>,
}

impl PlayerOptions {
    pub fn at_venue(venue: impl Into<String>) -> Self {
        Self {
            venue: Some(venue.into()),
        }
    }
}

/// A player's performance on one machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMachine {
    pub machine_key: String,
    pub machine_name: String,
    pub games: u32,
    pub p50: f64,
    pub p90: f64,
    pub league_p50: f64,
    pub relative_strength: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_venue_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerResult {
    pub name: String,
    pub venue: Option<String>,
    /// `None` when the player is not on a current roster.
    pub team: Option<PlayerTeam>,
    pub venue_stats: Option<Vec<PlayerMachine>>,
    pub global_stats: Vec<PlayerMachine>,
    pub analysis: StrengthSummary,
}

/// Profile one player across every machine they have played, or across the
/// machines at one venue.
pub async fn player<S: FactStore + ?Sized>(
    store: &S,
    name: &str,
    options: &PlayerOptions,
) -> Result<PlayerResult, StrategyError> {
    let baseline = store
        .league_baseline(P50)
        .await
        .context("load league baseline")?;
    let names = store.machine_names().await.context("load machine names")?;

    let (venue_stats, global_stats) = match options.venue.as_deref() {
        None => {
            let facts = player_facts(store, name, None).await?;
            (None, rows(&facts, &baseline, &names))
        }
        Some(venue) => {
            let machines = venue_machines(store, venue).await?;
            let venue_facts = at_machines(player_facts(store, name, Some(venue)).await?, &machines);
            let global_facts = at_machines(player_facts(store, name, None).await?, &machines);

            let venue_stats = rows(&venue_facts, &baseline, &names);
            let played: HashSet<&str> =
                venue_stats.iter().map(|m| m.machine_key.as_str()).collect();

            let mut global_stats = rows(&global_facts, &baseline, &names);
            for row in &mut global_stats {
                row.no_venue_data = !played.contains(row.machine_key.as_str());
            }
            (Some(venue_stats), global_stats)
        }
    };

    let team = match store.current_team_of(name).await {
        Ok(team) => team,
        Err(e) => {
            warn!("Could not look up current team for {}: {}", name, e);
            None
        }
    };

    Ok(PlayerResult {
        name: name.to_string(),
        venue: options.venue.clone(),
        team,
        analysis: analyze(&global_stats),
        venue_stats,
        global_stats,
    })
}

async fn player_facts<S: FactStore + ?Sized>(
    store: &S,
    name: &str,
    venue: Option<&str>,
) -> Result<Vec<PlayerMachineFacts>, StrategyError> {
    store
        .single_player_facts(name, venue)
        .await
        .with_context(|| format!("load player stats for {}", name))
}

fn at_machines(
    mut facts: Vec<PlayerMachineFacts>,
    machines: &HashSet<String>,
) -> Vec<PlayerMachineFacts> {
    facts.retain(|f| machines.contains(&f.machine_key));
    facts
}

fn rows(
    facts: &[PlayerMachineFacts],
    baseline: &LeagueBaseline,
    names: &HashMap<String, String>,
) -> Vec<PlayerMachine> {
    facts
        .iter()
        .filter_map(|f| {
            let stats = Percentiles::from_scores(&f.scores)?;
            let league_p50 = baseline.get(&f.machine_key);
            Some(PlayerMachine {
                machine_key: f.machine_key.clone(),
                machine_name: machine_name(names, &f.machine_key),
                games: stats.games,
                p50: stats.p50,
                p90: stats.p90,
                league_p50,
                relative_strength: relative_strength(stats.p50, league_p50),
                no_venue_data: false,
            })
        })
        .collect()
}

fn analyze(stats: &[PlayerMachine]) -> StrengthSummary {
    let entries: Vec<_> = stats
        .iter()
        .map(|m| strength_entry(&m.machine_name, m.games, m.relative_strength))
        .collect();
    strength_summary(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testing::{player_machine, MockStore};
    use pretty_assertions::assert_eq;

    fn store() -> MockStore {
        MockStore::new()
            .baseline("TAF", 40e6)
            .baseline("MM", 10e6)
            .baseline("TZ", 100e6)
            .name("TAF", "The Addams Family")
            .venue("SAM", &["TAF", "MM"])
            .team_of("Alice", "CRA", "Castle Crashers")
            .player(
                "Alice",
                None,
                vec![
                    player_machine("MM", &[5_000_000, 8_000_000, 12_000_000]),
                    player_machine("TAF", &[50_000_000, 60_000_000, 70_000_000, 80_000_000]),
                    player_machine("TZ", &[90_000_000]),
                ],
            )
            .player("Alice", Some("SAM"), vec![player_machine("TAF", &[80_000_000])])
    }

    #[tokio::test]
    async fn test_player_global() {
        let result = player(&store(), "Alice", &PlayerOptions::default())
            .await
            .unwrap();

        assert_eq!(result.name, "Alice");
        assert_eq!(result.team.as_ref().map(|t| t.key.as_str()), Some("CRA"));
        assert!(result.venue_stats.is_none());

        let keys: Vec<&str> = result.global_stats.iter().map(|m| m.machine_key.as_str()).collect();
        assert_eq!(keys, vec!["MM", "TAF", "TZ"]);

        let taf = &result.global_stats[1];
        assert_eq!(taf.machine_name, "The Addams Family");
        assert_eq!(taf.games, 4);
        // Sorted 50 60 70 80: P50 rank 2, P90 rank 4
        assert_eq!(taf.p50, 60e6);
        assert_eq!(taf.p90, 80e6);
        assert_eq!(taf.relative_strength, 50.0);

        // TZ has a single game and is left out of the summary
        assert_eq!(result.analysis.strongest, vec!["The Addams Family", "MM"]);
    }

    #[tokio::test]
    async fn test_player_at_venue() {
        let result = player(&store(), "Alice", &PlayerOptions::at_venue("SAM"))
            .await
            .unwrap();

        let venue_stats = result.venue_stats.unwrap();
        assert_eq!(venue_stats.len(), 1);
        assert_eq!(venue_stats[0].p50, 80e6);

        let flags: Vec<(&str, bool)> = result
            .global_stats
            .iter()
            .map(|m| (m.machine_key.as_str(), m.no_venue_data))
            .collect();
        assert_eq!(flags, vec![("MM", true), ("TAF", false)]);
    }

    #[tokio::test]
    async fn test_player_without_team() {
        let store = store().fail_on("current_team_of");
        let result = player(&store, "Alice", &PlayerOptions::default())
            .await
            .unwrap();
        assert!(result.team.is_none());

        let result = player(&MockStore::new(), "Nobody", &PlayerOptions::default())
            .await
            .unwrap();
        assert!(result.team.is_none());
        assert!(result.global_stats.is_empty());
    }

    #[tokio::test]
    async fn test_player_fact_error_is_fatal() {
        let err = player(
            &store().fail_on("single_player_facts"),
            "Alice",
            &PlayerOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("load player stats for Alice"));
    }
}
