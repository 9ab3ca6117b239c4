//! Display helpers shared by the CLI and anything else that renders results
//! as text.

use crate::calculate::relative_strength_rounded;
use crate::models::{Confidence, Edge, Side};

/// Explains the confidence glyphs printed next to edges.
pub const CONFIDENCE_LEGEND: &str = "Confidence: ▲ high (10+ games)  △ medium (3-9)  ▼ low (<3)";

/// Compact score: "2.5B", "1.2M", "45.7K" or a plain integer.
pub fn score(score: f64) -> String {
    let magnitude = score.abs();
    if magnitude >= 1_000_000_000.0 {
        format!("{:.1}B", score / 1_000_000_000.0)
    } else if magnitude >= 1_000_000.0 {
        format!("{:.1}M", score / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", score / 1_000.0)
    } else {
        format!("{:.0}", score)
    }
}

/// Signed compact score for differences, e.g. "+15.0M".
pub fn score_diff(diff: f64) -> String {
    if diff > 0.0 {
        format!("+{}", score(diff))
    } else {
        score(diff)
    }
}

/// Relative strength against the league P50: "(+50%)", "(-25%)", "(avg)",
/// or empty when there is no league data for the machine.
pub fn relative_strength(p50: f64, league_p50: f64) -> String {
    match relative_strength_rounded(p50, league_p50) {
        None => String::new(),
        Some(0) => "(avg)".to_string(),
        Some(pct) if pct > 0 => format!("(+{}%)", pct),
        Some(pct) => format!("({}%)", pct),
    }
}

/// Edge label: the favored team and the rounded percentage followed by the
/// confidence glyph. One-sided edges show only the team; a percentage that
/// rounds to zero is "Even".
pub fn edge(edge: &Edge, confidence: Confidence, team1: &str, team2: &str) -> String {
    let team = |side: Side| match side {
        Side::First => team1,
        Side::Second => team2,
    };

    match edge {
        Edge::OneSided(side) => team(*side).to_string(),
        Edge::Percent(_) => match edge.rounded_percent().unwrap_or(0) {
            0 => "Even".to_string(),
            pct if pct > 0 => format!("{} {}% {}", team1, pct, confidence.glyph()),
            pct => format!("{} {}% {}", team2, -pct, confidence.glyph()),
        },
    }
}
