//! Detail screen API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pokedex_core::DetailView;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AssetsResponse {
    pub id: String,
    pub artwork_url: String,
    pub cry_url: String,
    /// Whether audio playback is currently muted.
    pub muted: bool,
}

/// GET /api/v1/pokemon/{id_or_name}
///
/// 200 with the loaded record, 404 when the upstream has no such entry,
/// 502 with the localized "unable to load" message otherwise.
pub async fn get_pokemon(
    State(state): State<Arc<AppState>>,
    Path(id_or_name): Path<String>,
) -> Response {
    let view = state.session().detail(&id_or_name).await;
    let status = match view {
        DetailView::Loaded { .. } => StatusCode::OK,
        DetailView::NotFound => StatusCode::NOT_FOUND,
        DetailView::Unavailable { .. } => StatusCode::BAD_GATEWAY,
    };
    (status, Json(view)).into_response()
}

/// GET /api/v1/assets/{id}
///
/// Artwork and cry URLs. No upstream request is made.
pub async fn get_assets(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<AssetsResponse> {
    let session = state.session();
    Json(AssetsResponse {
        artwork_url: session.gateway().artwork_url(&id),
        cry_url: session.gateway().cry_url(&id),
        muted: session.display_settings().muted,
        id,
    })
}
