//! Who to put up on a machine, optionally against a specific opponent.

use std::collections::HashSet;

use serde::Serialize;

use crate::calculate::{aggregate_players, compare_p50, verdict};
use crate::models::{machine_name, Verdict, P50};
use crate::storage::FactStore;

use super::{QueryContext, StrategyError};

/// Options for [`recommend`].
#[derive(Debug, Clone, Default)]
pub struct RecommendOptions {
    pub venue: Option<String>,
    pub opponent: Option<String>,
}

impl RecommendOptions {
    pub fn at_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn vs(mut self, opponent: impl Into<String>) -> Self {
        self.opponent = Some(opponent.into());
        self
    }
}

/// A roster player's record on the machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contender {
    pub name: String,
    pub games: u32,
    pub p50: f64,
    pub p90: f64,
    pub league_p50: f64,
    /// Set on global rows when the player has no games on the machine at the venue.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_venue_data: bool,
}

/// One team's contenders, best P50 first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContenderLists {
    pub team: String,
    /// Games at the venue only. `None` without a venue.
    pub venue: Option<Vec<Contender>>,
    /// Games anywhere
    pub global: Vec<Contender>,
}

impl ContenderLists {
    /// The list verdicts are based on: the venue list when there is one.
    pub fn primary(&self) -> &[Contender] {
        self.venue.as_deref().unwrap_or(&self.global)
    }
}

/// Our best contender against theirs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub our_best: String,
    pub their_best: String,
    /// Our best P50 minus theirs
    pub diff: f64,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendResult {
    pub team: String,
    pub machine: String,
    pub machine_name: String,
    pub venue: Option<String>,
    pub opponent: Option<String>,
    pub league_p50: f64,
    pub ours: ContenderLists,
    pub theirs: Option<ContenderLists>,
    /// `None` without an opponent or when either side has no contenders
    pub assessment: Option<Assessment>,
}

/// Rank a team's contenders on one machine.
pub async fn recommend<S: FactStore + ?Sized>(
    store: &S,
    team: &str,
    machine: &str,
    options: &RecommendOptions,
) -> Result<RecommendResult, StrategyError> {
    let baseline = store
        .league_baseline(P50)
        .await
        .context("load league baseline")?;
    let names = store.machine_names().await.context("load machine names")?;
    let league_p50 = baseline.get(machine);
    let venue = options.venue.as_deref();

    let ours = contender_lists(store, team, machine, venue, league_p50).await?;

    let theirs = match options.opponent.as_deref() {
        Some(opponent) => {
            Some(contender_lists(store, opponent, machine, venue, league_p50).await?)
        }
        None => None,
    };

    let assessment = theirs.as_ref().and_then(|theirs| assess(&ours, theirs));

    Ok(RecommendResult {
        team: team.to_string(),
        machine: machine.to_string(),
        machine_name: machine_name(&names, machine),
        venue: options.venue.clone(),
        opponent: options.opponent.clone(),
        league_p50,
        ours,
        theirs,
        assessment,
    })
}

async fn contender_lists<S: FactStore + ?Sized>(
    store: &S,
    team: &str,
    machine: &str,
    venue: Option<&str>,
    league_p50: f64,
) -> Result<ContenderLists, StrategyError> {
    let Some(venue) = venue else {
        return Ok(ContenderLists {
            team: team.to_string(),
            venue: None,
            global: contenders(store, team, machine, None, league_p50).await?,
        });
    };

    let at_venue = contenders(store, team, machine, Some(venue), league_p50).await?;
    let played: HashSet<&str> = at_venue.iter().map(|c| c.name.as_str()).collect();

    let mut global = contenders(store, team, machine, None, league_p50).await?;
    for contender in &mut global {
        contender.no_venue_data = !played.contains(contender.name.as_str());
    }

    Ok(ContenderLists {
        team: team.to_string(),
        venue: Some(at_venue),
        global,
    })
}

async fn contenders<S: FactStore + ?Sized>(
    store: &S,
    team: &str,
    machine: &str,
    venue: Option<&str>,
    league_p50: f64,
) -> Result<Vec<Contender>, StrategyError> {
    let facts = store
        .roster_scoped_facts(team, venue)
        .await
        .with_context(|| format!("load player stats for {} on {}", team, machine))?;

    let Some(on_machine) = facts.iter().find(|f| f.machine_key == machine) else {
        return Ok(Vec::new());
    };

    let mut ranked: Vec<Contender> = aggregate_players(&on_machine.players)
        .into_iter()
        .map(|p| Contender {
            name: p.name,
            games: p.stats.games,
            p50: p.stats.p50,
            p90: p.stats.p90,
            league_p50,
            no_venue_data: false,
        })
        .collect();
    ranked.sort_by(|a, b| compare_p50(a.p50, b.p50));
    Ok(ranked)
}

fn assess(ours: &ContenderLists, theirs: &ContenderLists) -> Option<Assessment> {
    let our_best = ours.primary().first()?;
    let their_best = theirs.primary().first()?;

    Some(Assessment {
        our_best: our_best.name.clone(),
        their_best: their_best.name.clone(),
        diff: our_best.p50 - their_best.p50,
        verdict: verdict(our_best.p50, their_best.p50),
    })
}
