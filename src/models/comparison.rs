//! Head-to-head comparison outcomes: edges and verdicts.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One side of a two-team comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

/// Signed advantage of the first team over the second on one machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Percentage by which the stronger likely score exceeds the weaker,
    /// normalized by the weaker. Positive favors the first team.
    Percent(f64),

    /// Only one side has data; no meaningful percentage exists.
    OneSided(Side),
}

impl Edge {
    pub const EVEN: Edge = Edge::Percent(0.0);

    /// Numeric sort key. One-sided edges sort at the extremes.
    pub fn sort_key(&self) -> f64 {
        match self {
            Edge::Percent(pct) => *pct,
            Edge::OneSided(Side::First) => f64::MAX,
            Edge::OneSided(Side::Second) => -f64::MAX,
        }
    }

    /// Which team the edge favors, or None when even.
    pub fn favors(&self) -> Option<Side> {
        match self {
            Edge::OneSided(side) => Some(*side),
            Edge::Percent(pct) if *pct > 0.0 => Some(Side::First),
            Edge::Percent(pct) if *pct < 0.0 => Some(Side::Second),
            Edge::Percent(_) => None,
        }
    }

    /// Percentage rounded half away from zero, for display.
    pub fn rounded_percent(&self) -> Option<i64> {
        match self {
            Edge::Percent(pct) => Some(pct.round() as i64),
            Edge::OneSided(_) => None,
        }
    }

    pub fn is_even(&self) -> bool {
        self.favors().is_none()
    }
}

/// Order edges descending: the first team's biggest advantages first.
pub fn compare_edge(a: &Edge, b: &Edge) -> Ordering {
    b.sort_key().total_cmp(&a.sort_key())
}

/// Outcome of comparing each team's single best player on a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Our best outscores theirs by more than the threshold
    Favorable,
    /// Their best outscores ours by more than the threshold
    Unfavorable,
    /// Within the threshold either way
    Contested,
}

impl Verdict {
    /// Absolute score-unit threshold. Deliberately not scaled to the machine:
    /// on low-scoring machines nearly every comparison is contested.
    pub const THRESHOLD: f64 = 1_000_000.0;

    /// Classify a P50 difference (ours minus theirs).
    pub fn from_diff(diff: f64) -> Self {
        if diff > Self::THRESHOLD {
            Verdict::Favorable
        } else if diff < -Self::THRESHOLD {
            Verdict::Unfavorable
        } else {
            Verdict::Contested
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Favorable => write!(f, "favorable"),
            Verdict::Unfavorable => write!(f, "unfavorable"),
            Verdict::Contested => write!(f, "contested"),
        }
    }
}
