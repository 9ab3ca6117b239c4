//! Strategic views built on the calculation engine.
//!
//! Each strategy pulls raw facts from a [`FactStore`], aggregates them with
//! [`crate::calculate`] and returns a serializable result:
//! - [`scout()`]: a team's strengths and weaknesses by machine
//! - [`player()`]: one player's strengths and weaknesses by machine
//! - [`matchup()`]: two teams head to head at a venue
//! - [`recommend()`]: who to put up on one machine, optionally against an opponent
//!
//! Strategies never format output and never retry. A failed fetch aborts the
//! query with the name of the step that failed.

mod matchup;
mod player;
mod recommend;
mod scout;

#[cfg(test)]
pub(crate) mod testing;

pub use matchup::{matchup, MachineMatchup, MatchupResult, MatchupSummary};
pub use player::{player, PlayerMachine, PlayerOptions, PlayerResult};
pub use recommend::{recommend, Assessment, Contender, ContenderLists, RecommendOptions, RecommendResult};
pub use scout::{scout, ScoutMachine, ScoutOptions, ScoutResult};

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::calculate::StrengthEntry;
use crate::storage::{FactStore, StorageError};

/// Strategy errors.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("{context}: {source}")]
    Query {
        context: String,
        #[source]
        source: StorageError,
    },

    #[error("Query exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),
}

/// Attach the name of the failed query to a storage error.
pub(crate) trait QueryContext<T> {
    fn context(self, context: &str) -> Result<T, StrategyError>;

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T, StrategyError>;
}

impl<T> QueryContext<T> for Result<T, StorageError> {
    fn context(self, context: &str) -> Result<T, StrategyError> {
        self.with_context(|| context.to_string())
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T, StrategyError> {
        self.map_err(|source| StrategyError::Query {
            context: f(),
            source,
        })
    }
}

/// Run a strategy with a deadline. On timeout the query future is dropped,
/// which abandons any fetch still in flight, and no partial result escapes.
pub async fn with_deadline<T, F>(deadline: Duration, query: F) -> Result<T, StrategyError>
where
    F: Future<Output = Result<T, StrategyError>>,
{
    tokio::time::timeout(deadline, query)
        .await
        .map_err(|_| StrategyError::DeadlineExceeded(deadline))?
}

async fn venue_machines<S: FactStore + ?Sized>(
    store: &S,
    venue: &str,
) -> Result<HashSet<String>, StrategyError> {
    store
        .machines_at_venue(venue)
        .await
        .with_context(|| format!("load machines at {}", venue))
}

/// Strength summary input for profile rows that carry a name, games and strength.
fn strength_entry(name: &str, games: u32, relative_strength: f64) -> StrengthEntry {
    StrengthEntry {
        name: name.to_string(),
        games,
        relative_strength,
    }
}
