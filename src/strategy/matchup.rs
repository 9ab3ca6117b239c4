//! Head-to-head team comparison at a venue.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::calculate::{aggregate_team, compare_edge, confidence, edge, likely_score};
use crate::models::{machine_name, Confidence, Edge, LikelyPlayer, Side, TeamMachineStats};
use crate::storage::FactStore;

use super::{venue_machines, QueryContext, StrategyError};

/// Both teams on one machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineMatchup {
    pub machine_key: String,
    pub machine_name: String,
    /// Pooled team P50, `None` when the team has no games on the machine
    pub team1_p50: Option<f64>,
    /// Mean P50 of the likely players, 0 when there are none
    pub team1_likely: f64,
    pub team1_players: Vec<LikelyPlayer>,
    pub team2_p50: Option<f64>,
    pub team2_likely: f64,
    pub team2_players: Vec<LikelyPlayer>,
    /// Positive favors team 1
    pub edge: Edge,
    pub confidence: Confidence,
}

/// Machine names bucketed by which team has the edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchupSummary {
    pub team1_advantages: Vec<String>,
    pub team2_advantages: Vec<String>,
    pub contested: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupResult {
    pub venue: String,
    pub team1: String,
    pub team2: String,
    /// Sorted by edge, team 1's biggest advantages first
    pub machines: Vec<MachineMatchup>,
    pub analysis: MatchupSummary,
}

/// Compare two teams on every machine at a venue that either of them has
/// played anywhere.
pub async fn matchup<S: FactStore + ?Sized>(
    store: &S,
    venue: &str,
    team1: &str,
    team2: &str,
) -> Result<MatchupResult, StrategyError> {
    let machines = venue_machines(store, venue).await?;
    let names = store.machine_names().await.context("load machine names")?;

    let stats1 = team_stats(store, team1, &machines).await?;
    let stats2 = team_stats(store, team2, &machines).await?;

    let mut by_machine: HashMap<&str, &TeamMachineStats> = stats2
        .iter()
        .map(|s| (s.machine_key.as_str(), s))
        .collect();

    let mut rows = Vec::with_capacity(stats1.len() + stats2.len());
    for s1 in &stats1 {
        let s2 = by_machine.remove(s1.machine_key.as_str());
        rows.push(compare(&s1.machine_key, Some(s1), s2, &names));
    }
    // Machines only team 2 has played, in store order
    for s2 in stats2.iter().filter(|s| by_machine.contains_key(s.machine_key.as_str())) {
        rows.push(compare(&s2.machine_key, None, Some(s2), &names));
    }

    rows.sort_by(|a, b| compare_edge(&a.edge, &b.edge));

    Ok(MatchupResult {
        venue: venue.to_string(),
        team1: team1.to_string(),
        team2: team2.to_string(),
        analysis: analyze(&rows),
        machines: rows,
    })
}

/// A team's global stats restricted to the venue's machines.
async fn team_stats<S: FactStore + ?Sized>(
    store: &S,
    team: &str,
    machines: &HashSet<String>,
) -> Result<Vec<TeamMachineStats>, StrategyError> {
    let mut facts = store
        .roster_scoped_facts(team, None)
        .await
        .with_context(|| format!("load team stats for {}", team))?;
    facts.retain(|f| machines.contains(&f.machine_key));
    Ok(aggregate_team(&facts))
}

fn compare(
    machine_key: &str,
    s1: Option<&TeamMachineStats>,
    s2: Option<&TeamMachineStats>,
    names: &HashMap<String, String>,
) -> MachineMatchup {
    let players = |s: Option<&TeamMachineStats>| {
        s.map(|s| s.likely_players.clone()).unwrap_or_default()
    };
    let team1_players = players(s1);
    let team2_players = players(s2);

    let l1 = likely_score(&team1_players);
    let l2 = likely_score(&team2_players);

    MachineMatchup {
        machine_key: machine_key.to_string(),
        machine_name: machine_name(names, machine_key),
        team1_p50: s1.map(|s| s.stats.p50),
        team1_likely: l1,
        team2_p50: s2.map(|s| s.stats.p50),
        team2_likely: l2,
        edge: edge(l1, l2),
        confidence: confidence(&team1_players, &team2_players),
        team1_players,
        team2_players,
    }
}

fn analyze(machines: &[MachineMatchup]) -> MatchupSummary {
    let mut summary = MatchupSummary::default();
    for m in machines {
        let bucket = match m.edge.favors() {
            Some(Side::First) => &mut summary.team1_advantages,
            Some(Side::Second) => &mut summary.team2_advantages,
            None => &mut summary.contested,
        };
        bucket.push(m.machine_name.clone());
    }
    summary
}
