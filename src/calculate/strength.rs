//! Relative strength against the league baseline.

use std::cmp::Ordering;

use crate::models::StrengthSummary;

/// Minimum games on a machine before it counts toward strongest/weakest.
pub const MIN_GAMES_FOR_ANALYSIS: u32 = 3;

/// How many machines each side of a strength summary lists.
const SUMMARY_LEN: usize = 3;

/// Percentage by which `value` exceeds `baseline`. Zero when the baseline is
/// zero (no league data), so this never divides by zero or yields NaN.
pub fn relative_strength(value: f64, baseline: f64) -> f64 {
    if baseline == 0.0 || !baseline.is_finite() || !value.is_finite() {
        return 0.0;
    }
    (value - baseline) / baseline * 100.0
}

/// Relative strength rounded for display, or `None` when there is no baseline
/// to compare against. `Some(0)` renders as "average".
pub fn relative_strength_rounded(value: f64, baseline: f64) -> Option<i64> {
    if baseline == 0.0 || !baseline.is_finite() {
        return None;
    }
    Some(relative_strength(value, baseline).round() as i64)
}

/// Order by relative strength, strongest first.
pub fn compare_strength(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// A machine considered for a strength summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthEntry {
    pub name: String,
    pub games: u32,
    pub relative_strength: f64,
}

/// Pick strongest and weakest machines.
///
/// Machines with fewer than [`MIN_GAMES_FOR_ANALYSIS`] games are ignored. The
/// rest are sorted by relative strength descending; the first three are the
/// strongest. Only when more than three remain are the last three, weakest
/// first, reported as weakest. With four or five entries the two lists share
/// middle machines.
pub fn strength_summary(entries: &[StrengthEntry]) -> StrengthSummary {
    let mut eligible: Vec<&StrengthEntry> = entries
        .iter()
        .filter(|e| e.games >= MIN_GAMES_FOR_ANALYSIS)
        .collect();
    eligible.sort_by(|a, b| compare_strength(a.relative_strength, b.relative_strength));

    let strongest = eligible
        .iter()
        .take(SUMMARY_LEN)
        .map(|e| e.name.clone())
        .collect();

    let weakest = if eligible.len() > SUMMARY_LEN {
        eligible
            .iter()
            .rev()
            .take(SUMMARY_LEN)
            .map(|e| e.name.clone())
            .collect()
    } else {
        Vec::new()
    };

    StrengthSummary { strongest, weakest }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, games: u32, rel: f64) -> StrengthEntry {
        StrengthEntry {
            name: name.to_string(),
            games,
            relative_strength: rel,
        }
    }

    #[test]
    fn test_relative_strength() {
        assert_eq!(relative_strength(1_500_000.0, 1_000_000.0), 50.0);
        assert_eq!(relative_strength(750_000.0, 1_000_000.0), -25.0);
    }

    #[test]
    fn test_relative_strength_zero_baseline() {
        assert_eq!(relative_strength(500_000.0, 0.0), 0.0);
        assert_eq!(relative_strength(0.0, 0.0), 0.0);
        assert_eq!(relative_strength_rounded(500_000.0, 0.0), None);
    }

    #[test]
    fn test_relative_strength_equal_is_average() {
        assert_eq!(relative_strength_rounded(1_000_000.0, 1_000_000.0), Some(0));
        // A tiny difference still rounds to average.
        assert_eq!(relative_strength_rounded(1_000_001.0, 1_000_000.0), Some(0));
    }

    #[test]
    fn test_compare_strength_descending() {
        let mut v = vec![-10.0, 50.0, 10.0];
        v.sort_by(|a, b| compare_strength(*a, *b));
        assert_eq!(v, vec![50.0, 10.0, -10.0]);
    }

    #[test]
    fn test_strength_summary_with_floor_and_overlap() {
        let entries = vec![
            entry("A", 5, 50.0),
            entry("B", 5, 30.0),
            entry("C", 5, 10.0),
            entry("D", 5, -10.0),
            entry("E", 2, -30.0),
        ];
        let summary = strength_summary(&entries);
        assert_eq!(summary.strongest, vec!["A", "B", "C"]);
        assert_eq!(summary.weakest, vec!["D", "C", "B"]);
    }

    #[test]
    fn test_strength_summary_three_or_fewer_has_no_weakest() {
        let entries = vec![entry("A", 3, 5.0), entry("B", 4, -5.0), entry("C", 9, 0.0)];
        let summary = strength_summary(&entries);
        assert_eq!(summary.strongest, vec!["A", "C", "B"]);
        assert!(summary.weakest.is_empty());
    }

    #[test]
    fn test_strength_summary_disjoint_with_six() {
        let entries: Vec<StrengthEntry> = (0..6)
            .map(|i| entry(&format!("M{}", i), 10, 60.0 - 20.0 * i as f64))
            .collect();
        let summary = strength_summary(&entries);
        assert_eq!(summary.strongest, vec!["M0", "M1", "M2"]);
        assert_eq!(summary.weakest, vec!["M5", "M4", "M3"]);
    }

    #[test]
    fn test_strength_summary_empty() {
        assert_eq!(strength_summary(&[]), StrengthSummary::default());
        assert_eq!(
            strength_summary(&[entry("A", 2, 99.0)]),
            StrengthSummary::default()
        );
    }
}
