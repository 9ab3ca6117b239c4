//! League reference data: machines, venues, teams and rosters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A pinball machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Short code (e.g., "TAF")
    pub key: String,

    /// Full name (e.g., "The Addams Family")
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

impl Machine {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            manufacturer: None,
            year: None,
        }
    }
}

/// A venue and the machines it had in one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub key: String,
    pub name: String,
    pub season: u32,
    #[serde(default)]
    pub machines: Vec<String>,
}

/// Roster role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Captain,
    Assistant,
    #[default]
    Player,
}

/// A player on a team roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player: String,
    #[serde(default)]
    pub role: Role,
}

impl RosterEntry {
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            player: name.into(),
            role: Role::Player,
        }
    }
}

/// A team as it existed in one season. Team keys repeat across seasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeason {
    pub key: String,
    pub name: String,
    pub season: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_venue: Option<String>,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

impl TeamSeason {
    pub fn has_player(&self, name: &str) -> bool {
        self.roster.iter().any(|r| r.player == name)
    }
}

/// A player's current team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTeam {
    pub key: String,
    pub name: String,
}

/// Team listing entry for the current season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub key: String,
    pub name: String,
    /// Home venue key, if the team has one
    pub venue: Option<String>,
}

/// Venue listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueSummary {
    pub key: String,
    pub name: String,
}

/// Player listing entry for the current season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub team_key: String,
    pub team: String,
}

/// Look up a machine's display name, falling back to its key.
pub fn machine_name(names: &HashMap<String, String>, key: &str) -> String {
    names.get(key).cloned().unwrap_or_else(|| key.to_string())
}

/// Case-insensitive substring match on a key or name. An empty search matches
/// everything.
pub fn matches_search(key: &str, name: &str, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let search = search.to_lowercase();
    key.to_lowercase().contains(&search) || name.to_lowercase().contains(&search)
}
