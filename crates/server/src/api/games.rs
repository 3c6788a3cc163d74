//! Game search and cache API handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use meeplelog_core::{GameStats, PersistedGame, SearchError, SearchResultItem, StoreError};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub games: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

#[derive(Debug, Serialize)]
pub struct GameListResponse {
    pub games: Vec<PersistedGame>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn search_error(err: SearchError) -> ApiError {
    let status = match err {
        SearchError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        SearchError::UpstreamUnavailable(_) | SearchError::UpstreamTransport(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    api_error(status, err.to_string())
}

fn query_rejection(err: QueryRejection) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, err.body_text())
}

fn store_error(err: StoreError, local_id: &str) -> ApiError {
    match err {
        StoreError::NotFound(_) => {
            api_error(StatusCode::NOT_FOUND, format!("Game not found: {}", local_id))
        }
        e => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn run_search(state: &AppState, query: &str) -> Result<Json<SearchResponse>, ApiError> {
    let games = state.search().search(query).await.map_err(search_error)?;
    Ok(Json(SearchResponse { games }))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/games/search
///
/// Search the catalog and cache every returned game.
pub async fn search_games(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
    run_search(&state, &request.query).await
}

/// GET /api/v1/games/search?query=
pub async fn search_games_get(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(query_rejection)?;
    run_search(&state, &params.query).await
}

/// GET /api/v1/games
///
/// List cached games, newest first.
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<GameListResponse>, ApiError> {
    let Query(params) = params.map_err(query_rejection)?;
    let games = state
        .store()
        .list(params.limit)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let total = games.len();
    Ok(Json(GameListResponse { games, total }))
}

/// GET /api/v1/games/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<GameStats>, ApiError> {
    state
        .store()
        .stats()
        .map(Json)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /api/v1/games/{local_id}
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(local_id): Path<String>,
) -> Result<Json<PersistedGame>, ApiError> {
    state
        .store()
        .get(&local_id)
        .map(Json)
        .map_err(|e| store_error(e, &local_id))
}

/// DELETE /api/v1/games/{local_id}
///
/// Remove a game from the cache. The next search that returns it caches it
/// again under a new local id.
pub async fn remove_game(
    State(state): State<Arc<AppState>>,
    Path(local_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .store()
        .remove(&local_id)
        .map_err(|e| store_error(e, &local_id))?;
    Ok(Json(SuccessResponse {
        message: format!("Removed {} from cache", local_id),
    }))
}
