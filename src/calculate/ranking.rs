//! Contender ordering.

use std::cmp::Ordering;

use crate::models::LikelyPlayer;

/// How many likely players are kept per machine.
pub const LIKELY_PLAYERS: usize = 2;

/// Likely-player order: most games first, then higher P50.
///
/// Play count is the best predictor of who a captain will put up on a
/// machine; P50 only breaks ties.
pub fn compare_likely(a: &LikelyPlayer, b: &LikelyPlayer) -> Ordering {
    b.games.cmp(&a.games).then_with(|| b.p50.total_cmp(&a.p50))
}

/// Recommendation order: higher P50 first. Ties are left as they are.
pub fn compare_p50(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Rank candidates with [`compare_likely`] and keep the top `n`. No minimum
/// game count applies.
pub fn top_likely(mut candidates: Vec<LikelyPlayer>, n: usize) -> Vec<LikelyPlayer> {
    candidates.sort_by(compare_likely);
    candidates.truncate(n);
    candidates
}
