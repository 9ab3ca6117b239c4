//! Raw score facts as handed over by a fact store, grouped and ready to rank.

use serde::{Deserialize, Serialize};

/// All of one player's scores on one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScores {
    pub player: String,
    pub scores: Vec<i64>,
}

/// A team's roster-scoped scores on one machine, per player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineFacts {
    pub machine_key: String,
    pub players: Vec<PlayerScores>,
}

impl MachineFacts {
    pub fn games(&self) -> usize {
        self.players.iter().map(|p| p.scores.len()).sum()
    }

    /// Every player's scores pooled into one list.
    pub fn pooled_scores(&self) -> Vec<i64> {
        self.players
            .iter()
            .flat_map(|p| p.scores.iter().copied())
            .collect()
    }
}

/// A single player's scores on one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMachineFacts {
    pub machine_key: String,
    pub scores: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_facts_pooling() {
        let facts = MachineFacts {
            machine_key: "TAF".to_string(),
            players: vec![
                PlayerScores {
                    player: "Alice".to_string(),
                    scores: vec![3, 1],
                },
                PlayerScores {
                    player: "Bob".to_string(),
                    scores: vec![2],
                },
            ],
        };
        assert_eq!(facts.games(), 3);
        assert_eq!(facts.pooled_scores(), vec![3, 1, 2]);
    }
}
