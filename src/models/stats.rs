//! Derived statistics models.
//!
//! Everything here is computed from game records on demand and never
//! updated in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Median percentile.
pub const P50: f64 = 50.0;

/// Ceiling percentile.
pub const P90: f64 = 90.0;

/// Games played plus the median and ceiling scores selected from one sorted
/// score list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub games: u32,
    pub p50: f64,
    pub p90: f64,
}

/// A player likely to be put up on a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelyPlayer {
    pub name: String,
    pub games: u32,
    pub p50: f64,
}

/// One player's aggregated scores on one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub stats: Percentiles,
}

impl PlayerStats {
    pub fn as_likely(&self) -> LikelyPlayer {
        LikelyPlayer {
            name: self.name.clone(),
            games: self.stats.games,
            p50: self.stats.p50,
        }
    }
}

/// A team's aggregated scores on one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMachineStats {
    pub machine_key: String,

    /// Pooled over every roster player's games on the machine
    pub stats: Percentiles,

    /// Top 2 by games played, then P50
    pub likely_players: Vec<LikelyPlayer>,
}

/// Per-machine league-wide percentile over every current roster player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueBaseline {
    pub percentile: f64,
    values: HashMap<String, f64>,
}

impl LeagueBaseline {
    pub fn new(percentile: f64, values: HashMap<String, f64>) -> Self {
        Self { percentile, values }
    }

    /// Baseline for a machine, or 0 when the league has no data for it.
    pub fn get(&self, machine_key: &str) -> f64 {
        self.values.get(machine_key).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.values.iter()
    }
}

/// Strongest and weakest machines by relative strength.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthSummary {
    /// Machine names, up to 3, strongest first
    pub strongest: Vec<String>,

    /// Machine names, up to 3, weakest first
    pub weakest: Vec<String>,
}
