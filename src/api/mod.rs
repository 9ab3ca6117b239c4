//! REST API endpoints.
//!
//! Axum-based JSON API over the cached fact store: reference listings for
//! dropdowns plus the scout, player, matchup and recommend views.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::storage::StorageError;
use crate::strategy::StrategyError;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StrategyError> for ApiError {
    fn from(e: StrategyError) -> Self {
        match e {
            StrategyError::DeadlineExceeded(_) => ApiError::Timeout(e.to_string()),
            StrategyError::Query { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Build the API router. `cors_origin` is "*" or a single allowed origin.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/health", get(routes::reference::health))
        .route("/api/teams", get(routes::reference::teams))
        .route("/api/venues", get(routes::reference::venues))
        .route("/api/machines", get(routes::reference::machines))
        .route("/api/players", get(routes::reference::players))
        .route("/api/teams/:team/scout", get(routes::strategy::scout))
        .route(
            "/api/teams/:team/recommend/:machine",
            get(routes::strategy::recommend),
        )
        .route("/api/players/:name", get(routes::strategy::player))
        .route(
            "/api/matchup/:venue/:team1/:team2",
            get(routes::strategy::matchup),
        )
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::from(Any)
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!("Invalid CORS origin {:?} ({}), allowing any origin", origin, e);
                AllowOrigin::from(Any)
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedStore;
    use crate::storage::write_lake;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    async fn setup() -> (TempDir, Router) {
        let (dir, store) = write_lake();
        let state = AppState {
            store: Arc::new(CachedStore::load(store).await.unwrap()),
            query_timeout: Duration::from_secs(5),
        };
        (dir, build_router(state, "*"))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = setup().await;
        let (status, json) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["teams"], 2);
        assert_eq!(json["players"], 3);
    }

    #[tokio::test]
    async fn test_reference_listings() {
        let (_dir, app) = setup().await;

        let (status, json) = get_json(app.clone(), "/api/teams?search=pyc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["key"], "PYC");

        let (_, json) = get_json(app.clone(), "/api/venues").await;
        assert_eq!(json[0]["name"], "Sam's Tavern");

        let (_, json) = get_json(app.clone(), "/api/machines?search=").await;
        assert_eq!(json.as_array().unwrap().len(), 2);

        let (status, json) = get_json(app.clone(), "/api/players").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

        let (_, json) = get_json(app, "/api/players?search=crash").await;
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["team_key"], "CRA");
        assert_eq!(json[0]["team"], "Castle Crashers");
    }

    #[tokio::test]
    async fn test_scout_route() {
        let (_dir, app) = setup().await;
        let (status, json) = get_json(app, "/api/teams/CRA/scout?venue=SAM").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["team"], "CRA");
        assert_eq!(json["venue"], "SAM");
        assert_eq!(json["global_stats"].as_array().unwrap().len(), 2);
        assert_eq!(json["global_stats"][1]["machine_name"], "The Addams Family");
    }

    #[tokio::test]
    async fn test_scout_route_empty_venue_is_global() {
        let (_dir, app) = setup().await;
        let (status, json) = get_json(app, "/api/teams/CRA/scout?venue=").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["venue"].is_null());
        assert!(json["venue_stats"].is_null());
    }

    #[tokio::test]
    async fn test_player_route() {
        let (_dir, app) = setup().await;
        let (status, json) = get_json(app, "/api/players/Carol").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["team"]["key"], "PYC");
        assert_eq!(json["global_stats"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_matchup_route() {
        let (_dir, app) = setup().await;
        let (status, json) = get_json(app, "/api/matchup/SAM/CRA/PYC").await;

        assert_eq!(status, StatusCode::OK);
        let machines = json["machines"].as_array().unwrap();
        assert_eq!(machines.len(), 2);
        // TAF: CRA likely 40M vs PYC 20M
        assert_eq!(machines[0]["machine_key"], "TAF");
        assert_eq!(machines[0]["edge"]["percent"], 100.0);
        assert_eq!(json["analysis"]["team2_advantages"][0], "MM");
    }

    #[tokio::test]
    async fn test_matchup_same_team_is_bad_request() {
        let (_dir, app) = setup().await;
        let (status, json) = get_json(app, "/api/matchup/SAM/CRA/CRA").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_recommend_route() {
        let (_dir, app) = setup().await;
        let (status, json) = get_json(app, "/api/teams/CRA/recommend/TAF?opponent=PYC").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ours"]["global"][0]["name"], "Alice");
        assert_eq!(json["assessment"]["verdict"], "favorable");
        assert_eq!(json["assessment"]["diff"], 20_000_000.0);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (_dir, app) = setup().await;
        let (status, _) = get_json(app, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_strategy_error_mapping() {
        let timeout = ApiError::from(StrategyError::DeadlineExceeded(Duration::from_secs(1)));
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let failed = ApiError::from(StrategyError::Query {
            context: "load league baseline".to_string(),
            source: StorageError::Unavailable("down".to_string()),
        });
        assert_eq!(
            failed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
