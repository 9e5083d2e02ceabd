//! List screen API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use pokedex_core::{SortOrder, ViewModel};
use serde::Deserialize;

use super::handlers::{upstream_error, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Respond only once the query has been resolved.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub order: SortOrder,
}

type ApiResult = Result<Json<ViewModel>, (StatusCode, Json<ErrorResponse>)>;

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/entries
///
/// Current view model of the list screen.
pub async fn get_entries(State(state): State<Arc<AppState>>) -> Json<ViewModel> {
    Json(state.session().view().await)
}

/// POST /api/v1/entries/load-more
///
/// Append the next page. A no-op when exhausted, already loading, or while
/// a search match is shown.
pub async fn load_more(State(state): State<Arc<AppState>>) -> ApiResult {
    let session = state.session();
    session.load_more().await.map_err(upstream_error)?;
    Ok(Json(session.view().await))
}

/// POST /api/v1/entries/refresh
///
/// Re-run the first page and replace the accumulated list.
pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult {
    let session = state.session();
    session.refresh().await.map_err(upstream_error)?;
    Ok(Json(session.view().await))
}

/// PUT /api/v1/query
///
/// Replace the search query. Resolution is debounced unless `wait` is set.
pub async fn set_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Json<ViewModel> {
    let session = state.session();
    session.set_query(&request.query);
    if request.wait {
        session.search().settled().await;
    }
    Json(session.view().await)
}

/// PUT /api/v1/sort
///
/// Switch list ordering; clears the query and restarts pagination.
pub async fn set_sort(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SortRequest>,
) -> ApiResult {
    let session = state.session();
    session
        .set_sort_order(request.order)
        .await
        .map_err(upstream_error)?;
    Ok(Json(session.view().await))
}
