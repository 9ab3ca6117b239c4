//! Read-through cache for slow-changing reference data.
//!
//! Teams, players, venues, machines, machine names and the league P50 baseline only
//! change when new data lands in the lake. [`CachedStore`] serves them from an
//! immutable [`ReferenceSnapshot`] and passes every other query through.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{
    matches_search, LeagueBaseline, Machine, MachineFacts, PlayerMachineFacts, PlayerSummary,
    PlayerTeam, TeamSummary, VenueSummary, P50,
};
use crate::storage::{FactStore, StorageError};

/// One consistent set of reference data.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceSnapshot {
    pub league_p50: LeagueBaseline,
    pub machine_names: HashMap<String, String>,
    pub teams: Vec<TeamSummary>,
    pub players: Vec<PlayerSummary>,
    pub venues: Vec<VenueSummary>,
    pub machines: Vec<Machine>,
    pub refreshed_at: DateTime<Utc>,
}

impl ReferenceSnapshot {
    /// Read every cached query from `store`.
    pub async fn build<S: FactStore + ?Sized>(store: &S) -> Result<Self, StorageError> {
        let teams = store.list_teams("").await?;
        let players = store.list_players("").await?;
        let venues = store.list_venues("").await?;
        let machines = store.list_machines("").await?;
        let league_p50 = store.league_baseline(P50).await?;
        let machine_names = store.machine_names().await?;

        Ok(Self {
            league_p50,
            machine_names,
            teams,
            players,
            venues,
            machines,
            refreshed_at: Utc::now(),
        })
    }
}

/// A fact store wrapper that serves reference data from memory.
pub struct CachedStore<S> {
    inner: S,
    snapshot: RwLock<Arc<ReferenceSnapshot>>,
}

impl<S: FactStore> CachedStore<S> {
    /// Wrap `inner` and populate the cache.
    pub async fn load(inner: S) -> Result<Self, StorageError> {
        let snapshot = ReferenceSnapshot::build(&inner).await?;
        info!(
            "Reference cache loaded: {} teams, {} venues, {} machines",
            snapshot.teams.len(),
            snapshot.venues.len(),
            snapshot.machines.len()
        );

        Ok(Self {
            inner,
            snapshot: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Rebuild the snapshot from the wrapped store and swap it in.
    ///
    /// On error the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<(), StorageError> {
        let snapshot = Arc::new(ReferenceSnapshot::build(&self.inner).await?);
        let refreshed_at = snapshot.refreshed_at;

        *self.snapshot.write().await = snapshot;

        info!("Reference cache refreshed at {}", refreshed_at);
        Ok(())
    }

    /// The current snapshot. It never changes once handed out.
    pub async fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn filter_cached<T: Clone>(items: &[T], search: &str, key_name: impl Fn(&T) -> (&str, &str)) -> Vec<T> {
    items
        .iter()
        .filter(|item| {
            let (key, name) = key_name(item);
            matches_search(key, name, search)
        })
        .cloned()
        .collect()
}

#[async_trait]
impl<S: FactStore> FactStore for CachedStore<S> {
    async fn roster_scoped_facts(
        &self,
        team: &str,
        venue: Option<&str>,
    ) -> Result<Vec<MachineFacts>, StorageError> {
        self.inner.roster_scoped_facts(team, venue).await
    }

    async fn single_player_facts(
        &self,
        player: &str,
        venue: Option<&str>,
    ) -> Result<Vec<PlayerMachineFacts>, StorageError> {
        self.inner.single_player_facts(player, venue).await
    }

    async fn league_baseline(&self, percentile: f64) -> Result<LeagueBaseline, StorageError> {
        let snapshot = self.snapshot().await;
        if snapshot.league_p50.percentile == percentile {
            return Ok(snapshot.league_p50.clone());
        }
        debug!("League baseline P{} is not cached", percentile);
        self.inner.league_baseline(percentile).await
    }

    async fn machines_at_venue(&self, venue: &str) -> Result<HashSet<String>, StorageError> {
        self.inner.machines_at_venue(venue).await
    }

    async fn machine_names(&self) -> Result<HashMap<String, String>, StorageError> {
        Ok(self.snapshot().await.machine_names.clone())
    }

    async fn current_team_of(&self, player: &str) -> Result<Option<PlayerTeam>, StorageError> {
        self.inner.current_team_of(player).await
    }

    async fn list_teams(&self, search: &str) -> Result<Vec<TeamSummary>, StorageError> {
        let snapshot = self.snapshot().await;
        Ok(filter_cached(&snapshot.teams, search, |t| (t.key.as_str(), t.name.as_str())))
    }

    async fn list_venues(&self, search: &str) -> Result<Vec<VenueSummary>, StorageError> {
        let snapshot = self.snapshot().await;
        Ok(filter_cached(&snapshot.venues, search, |v| (v.key.as_str(), v.name.as_str())))
    }

    async fn list_machines(&self, search: &str) -> Result<Vec<Machine>, StorageError> {
        let snapshot = self.snapshot().await;
        Ok(filter_cached(&snapshot.machines, search, |m| (m.key.as_str(), m.name.as_str())))
    }

    async fn list_players(&self, search: &str) -> Result<Vec<PlayerSummary>, StorageError> {
        let snapshot = self.snapshot().await;
        Ok(snapshot
            .players
            .iter()
            .filter(|p| {
                matches_search(&p.team_key, &p.team, search) || matches_search(&p.name, "", search)
            })
            .cloned()
            .collect())
    }
}
