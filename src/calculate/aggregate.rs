//! Turn grouped score facts into per-machine statistics.

use crate::models::{MachineFacts, Percentiles, PlayerScores, PlayerStats, TeamMachineStats};

use super::ranking::{top_likely, LIKELY_PLAYERS};

/// Per-player percentiles. Players without scores are dropped.
pub fn aggregate_players(players: &[PlayerScores]) -> Vec<PlayerStats> {
    players
        .iter()
        .filter_map(|p| {
            Percentiles::from_scores(&p.scores).map(|stats| PlayerStats {
                name: p.player.clone(),
                stats,
            })
        })
        .collect()
}

/// Team statistics for one machine: pooled percentiles plus the top likely
/// players. `None` when nobody on the roster has a score on it.
pub fn aggregate_machine(facts: &MachineFacts) -> Option<TeamMachineStats> {
    let stats = Percentiles::from_scores(&facts.pooled_scores())?;
    let candidates: Vec<_> = aggregate_players(&facts.players)
        .iter()
        .map(PlayerStats::as_likely)
        .collect();

    Some(TeamMachineStats {
        machine_key: facts.machine_key.clone(),
        stats,
        likely_players: top_likely(candidates, LIKELY_PLAYERS),
    })
}

/// Team statistics for every machine in `facts`, in the same order.
pub fn aggregate_team(facts: &[MachineFacts]) -> Vec<TeamMachineStats> {
    facts.iter().filter_map(aggregate_machine).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(player: &str, scores: &[i64]) -> PlayerScores {
        PlayerScores {
            player: player.to_string(),
            scores: scores.to_vec(),
        }
    }

    #[test]
    fn test_aggregate_machine_pools_and_ranks() {
        let facts = MachineFacts {
            machine_key: "TAF".to_string(),
            players: vec![
                scores("Alice", &[350, 400]),
                scores("Bob", &[500]),
                scores("Carol", &[100, 200, 300]),
            ],
        };

        let stats = aggregate_machine(&facts).unwrap();
        assert_eq!(stats.machine_key, "TAF");
        assert_eq!(stats.stats.games, 6);
        // Pooled sorted: 100 200 300 350 400 500; P50 rank 3, P90 rank 6
        assert_eq!(stats.stats.p50, 300.0);
        assert_eq!(stats.stats.p90, 500.0);

        let names: Vec<&str> = stats.likely_players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice"]);
        assert_eq!(stats.likely_players[1].p50, 350.0);
    }

    #[test]
    fn test_aggregate_machine_without_scores() {
        let facts = MachineFacts {
            machine_key: "MM".to_string(),
            players: vec![scores("Alice", &[])],
        };
        assert!(aggregate_machine(&facts).is_none());
    }

    #[test]
    fn test_aggregate_players_drops_empty() {
        let stats = aggregate_players(&[scores("Alice", &[10]), scores("Bob", &[])]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "Alice");
        assert_eq!(stats[0].stats.games, 1);
    }

    #[test]
    fn test_aggregate_team_keeps_order() {
        let facts = vec![
            MachineFacts {
                machine_key: "TZ".to_string(),
                players: vec![scores("Alice", &[1])],
            },
            MachineFacts {
                machine_key: "AFM".to_string(),
                players: vec![scores("Bob", &[2])],
            },
        ];
        let keys: Vec<String> = aggregate_team(&facts)
            .into_iter()
            .map(|s| s.machine_key)
            .collect();
        assert_eq!(keys, vec!["TZ", "AFM"]);
    }
}
