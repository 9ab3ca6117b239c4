//! Statistics calculation engine.
//!
//! Pure functions over score facts:
//! - Nearest-rank percentiles (P50 and the P90 ceiling)
//! - Relative strength against the league baseline
//! - Likely-player and strength rankings
//! - Head-to-head edges, confidence and verdicts
//!
//! Nothing in here does I/O or holds state, so it is safe to call from any
//! number of request tasks at once.

mod aggregate;
mod head_to_head;
mod percentile;
mod ranking;
mod strength;

pub use aggregate::{aggregate_machine, aggregate_players, aggregate_team};
pub use head_to_head::{average_games, confidence, edge, likely_score};
pub use percentile::percentile;
pub use ranking::{compare_likely, compare_p50, top_likely, LIKELY_PLAYERS};
pub use strength::{
    compare_strength, relative_strength, relative_strength_rounded, strength_summary,
    StrengthEntry, MIN_GAMES_FOR_ANALYSIS,
};

pub use crate::models::compare_edge;

use crate::models::Verdict;

/// Verdict for our best player's P50 against theirs.
pub fn verdict(ours_p50: f64, theirs_p50: f64) -> Verdict {
    Verdict::from_diff(ours_p50 - theirs_p50)
}
