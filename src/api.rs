//! HTTP API endpoints for the presentation layer.
//!
//! Every screen reads `GET /api/session` and drives the game through the
//! POST endpoints below. The custom pool lives under `/api/pool`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::CatalogError;
use crate::protocol::{ErrorResponse, PoolSelection, SessionView, StartRequest};
use crate::state::{AppState, SessionError};
use crate::types::{FilterCriteria, Movie, MovieId, RoleCard};

/// Errors returned to API callers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("No role to reveal right now")]
    NothingToReveal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Session(SessionError::InvalidPlayerCount(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_PLAYER_COUNT")
            }
            ApiError::Session(SessionError::Catalog(CatalogError::MissingApiKey)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CATALOG_NOT_CONFIGURED")
            }
            ApiError::Session(SessionError::Catalog(_)) => {
                (StatusCode::BAD_GATEWAY, "MOVIE_LOAD_FAILED")
            }
            ApiError::NothingToReveal => (StatusCode::CONFLICT, "NOTHING_TO_REVEAL"),
        };

        let msg = match &self {
            ApiError::Session(e) => e.user_message(),
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                msg,
            }),
        )
            .into_response()
    }
}

/// Routes for the JSON API, without static file serving
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/session", get(get_session))
        .route("/api/session/start", post(start_session))
        .route("/api/session/reveal", post(reveal_role))
        .route("/api/session/advance", post(advance_turn))
        .route("/api/session/reset", post(reset_session))
        .route("/api/pool/candidates", post(load_candidates))
        .route("/api/pool", get(get_pool).put(approve_pool).delete(clear_pool))
}

async fn health() -> &'static str {
    "ok"
}

/// GET /api/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.view().await)
}

/// POST /api/session/start
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> Result<Json<SessionView>, ApiError> {
    state
        .start(req.player_count, req.filters, req.hints, req.pool)
        .await?;
    Ok(Json(state.view().await))
}

/// POST /api/session/reveal
pub async fn reveal_role(State(state): State<Arc<AppState>>) -> Result<Json<RoleCard>, ApiError> {
    state
        .reveal_role()
        .await
        .map(Json)
        .ok_or(ApiError::NothingToReveal)
}

/// POST /api/session/advance
pub async fn advance_turn(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    state.advance_turn().await;
    Json(state.view().await)
}

/// POST /api/session/reset
pub async fn reset_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    state.reset().await;
    Json(state.view().await)
}

/// POST /api/pool/candidates
///
/// Fetches a fresh candidate list for the curation screen. Does not change the stored pool.
pub async fn load_candidates(
    State(state): State<Arc<AppState>>,
    Json(filters): Json<FilterCriteria>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    Ok(Json(state.load_pool_candidates(&filters).await?))
}

/// GET /api/pool
pub async fn get_pool(State(state): State<Arc<AppState>>) -> Json<Vec<Movie>> {
    Json(state.custom_pool().await)
}

/// PUT /api/pool
pub async fn approve_pool(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<PoolSelection>,
) -> Json<Vec<Movie>> {
    let selected: HashSet<MovieId> = selection.selected_ids.into_iter().collect();
    Json(state.approve_pool(selection.candidates, &selected).await)
}

/// DELETE /api/pool
pub async fn clear_pool(State(state): State<Arc<AppState>>) -> StatusCode {
    state.clear_custom_pool().await;
    StatusCode::NO_CONTENT
}
