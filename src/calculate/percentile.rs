//! Nearest-rank percentiles.

use crate::models::{Percentiles, P50, P90};

/// Select the nearest-rank percentile from an ascending-sorted slice.
///
/// Uses the 1-indexed rank `floor(p * (n + 1) / 100)` clamped to `[1, n]`.
/// No interpolation: the result is always an observed score.
fn select_sorted(sorted: &[i64], p: f64) -> Option<i64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let p = p.clamp(0.0, 100.0);
    let rank = (p * (n + 1) as f64 / 100.0).floor() as usize;
    let rank = rank.clamp(1, n);
    Some(sorted[rank - 1])
}

/// Nearest-rank percentile of an unordered score list. `None` when empty.
pub fn percentile(scores: &[i64], p: f64) -> Option<f64> {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    select_sorted(&sorted, p).map(|s| s as f64)
}

impl Percentiles {
    /// P50 and P90 from a single sort of `scores`, so `p90 >= p50` always.
    /// `None` when there are no scores.
    pub fn from_scores(scores: &[i64]) -> Option<Self> {
        let mut sorted = scores.to_vec();
        sorted.sort_unstable();
        let p50 = select_sorted(&sorted, P50)?;
        let p90 = select_sorted(&sorted, P90)?;
        Some(Self {
            games: sorted.len() as u32,
            p50: p50 as f64,
            p90: p90 as f64,
        })
    }
}
