//! Confidence levels for head-to-head comparisons.

use serde::{Deserialize, Serialize};

/// How much sample data backs a matchup edge.
///
/// Derived from the average games played by each side's likely players;
/// the weaker side decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Either side's likely players average fewer than 3 games
    Low,
    /// Both sides average 3-9 games
    Medium,
    /// Both sides average 10+ games
    High,
}

impl Confidence {
    pub const HIGH_MIN_GAMES: f64 = 10.0;
    pub const MEDIUM_MIN_GAMES: f64 = 3.0;

    /// Classify from the minimum of the two sides' average game counts.
    pub fn from_min_average_games(min_avg: f64) -> Self {
        if min_avg >= Self::HIGH_MIN_GAMES {
            Confidence::High
        } else if min_avg >= Self::MEDIUM_MIN_GAMES {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Single-character marker used in tables.
    pub fn glyph(&self) -> &'static str {
        match self {
            Confidence::High => "▲",
            Confidence::Medium => "△",
            Confidence::Low => "▼",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(Confidence::from_min_average_games(0.0), Confidence::Low);
        assert_eq!(Confidence::from_min_average_games(2.5), Confidence::Low);
        assert_eq!(Confidence::from_min_average_games(3.0), Confidence::Medium);
        assert_eq!(Confidence::from_min_average_games(9.5), Confidence::Medium);
        assert_eq!(Confidence::from_min_average_games(10.0), Confidence::High);
        assert_eq!(Confidence::from_min_average_games(42.0), Confidence::High);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
    }

    #[test]
    fn test_confidence_serialization() {
        let json = serde_json::to_string(&Confidence::High).unwrap();
        assert_eq!(json, "\"high\"");

        let deserialized: Confidence = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Confidence::High);
    }

    #[test]
    fn test_confidence_display() {
        assert_eq!(format!("{}", Confidence::High), "high");
        assert_eq!(format!("{}", Confidence::Medium), "medium");
        assert_eq!(format!("{}", Confidence::Low), "low");
    }
}
