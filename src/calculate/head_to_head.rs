//! Head-to-head math: likely scores, edges and confidence.

use crate::models::{Confidence, Edge, LikelyPlayer, Side};

/// Average P50 of a team's likely players, or 0 when there are none.
pub fn likely_score(players: &[LikelyPlayer]) -> f64 {
    if players.is_empty() {
        return 0.0;
    }
    players.iter().map(|p| p.p50).sum::<f64>() / players.len() as f64
}

/// Average games played by a team's likely players, or 0 when there are none.
pub fn average_games(players: &[LikelyPlayer]) -> f64 {
    if players.is_empty() {
        return 0.0;
    }
    players.iter().map(|p| p.games as f64).sum::<f64>() / players.len() as f64
}

/// Edge of likely score `l1` over `l2`, as a percentage of the smaller.
///
/// When the smaller is zero the sides are incomparable: equal values are even,
/// otherwise the edge is one-sided toward the nonzero team.
pub fn edge(l1: f64, l2: f64) -> Edge {
    let lo = l1.min(l2);
    if lo == 0.0 {
        return if l1 == l2 {
            Edge::EVEN
        } else if l1 > l2 {
            Edge::OneSided(Side::First)
        } else {
            Edge::OneSided(Side::Second)
        };
    }
    Edge::Percent((l1 - l2) / lo * 100.0)
}

/// Confidence backing an edge, decided by the side with less data.
pub fn confidence(first: &[LikelyPlayer], second: &[LikelyPlayer]) -> Confidence {
    let min_avg = average_games(first).min(average_games(second));
    Confidence::from_min_average_games(min_avg)
}
