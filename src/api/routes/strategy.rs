use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::strategy::{
    self, with_deadline, MatchupResult, PlayerOptions, PlayerResult, RecommendOptions,
    RecommendResult, ScoutOptions, ScoutResult,
};

#[derive(Debug, Deserialize)]
pub struct VenueParams {
    pub venue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub venue: Option<String>,
    pub opponent: Option<String>,
}

/// Empty query values mean "not set".
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn scout(
    State(state): State<AppState>,
    Path(team): Path<String>,
    Query(params): Query<VenueParams>,
) -> Result<Json<ScoutResult>, ApiError> {
    let options = ScoutOptions {
        venue: non_empty(params.venue),
    };
    debug!("Scout {} at {:?}", team, options.venue);

    let result = with_deadline(
        state.query_timeout,
        strategy::scout(state.store.as_ref(), &team, &options),
    )
    .await?;
    Ok(Json(result))
}

pub async fn player(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<VenueParams>,
) -> Result<Json<PlayerResult>, ApiError> {
    let options = PlayerOptions {
        venue: non_empty(params.venue),
    };

    let result = with_deadline(
        state.query_timeout,
        strategy::player(state.store.as_ref(), &name, &options),
    )
    .await?;
    Ok(Json(result))
}

pub async fn matchup(
    State(state): State<AppState>,
    Path((venue, team1, team2)): Path<(String, String, String)>,
) -> Result<Json<MatchupResult>, ApiError> {
    if team1 == team2 {
        return Err(ApiError::BadRequest(format!(
            "Cannot match {} against itself",
            team1
        )));
    }

    let result = with_deadline(
        state.query_timeout,
        strategy::matchup(state.store.as_ref(), &venue, &team1, &team2),
    )
    .await?;
    Ok(Json(result))
}

pub async fn recommend(
    State(state): State<AppState>,
    Path((team, machine)): Path<(String, String)>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResult>, ApiError> {
    let options = RecommendOptions {
        venue: non_empty(params.venue),
        opponent: non_empty(params.opponent),
    };
    if options.opponent.as_deref() == Some(team.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "Cannot compare {} against itself",
            team
        )));
    }

    let result = with_deadline(
        state.query_timeout,
        strategy::recommend(state.store.as_ref(), &team, &machine, &options),
    )
    .await?;
    Ok(Json(result))
}
