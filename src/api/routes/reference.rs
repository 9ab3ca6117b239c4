use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Machine, PlayerSummary, TeamSummary, VenueSummary};
use crate::storage::FactStore;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cache_refreshed_at: DateTime<Utc>,
    pub teams: usize,
    pub players: usize,
    pub venues: usize,
    pub machines: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.store.snapshot().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cache_refreshed_at: snapshot.refreshed_at,
        teams: snapshot.teams.len(),
        players: snapshot.players.len(),
        venues: snapshot.venues.len(),
        machines: snapshot.machines.len(),
    })
}

pub async fn teams(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<TeamSummary>>, ApiError> {
    Ok(Json(state.store.list_teams(params.search.trim()).await?))
}

pub async fn venues(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<VenueSummary>>, ApiError> {
    Ok(Json(state.store.list_venues(params.search.trim()).await?))
}

pub async fn machines(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Machine>>, ApiError> {
    Ok(Json(state.store.list_machines(params.search.trim()).await?))
}

pub async fn players(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PlayerSummary>>, ApiError> {
    Ok(Json(state.store.list_players(params.search.trim()).await?))
}
