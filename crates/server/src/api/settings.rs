//! Display settings API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use pokedex_core::{DisplaySettings, Language};
use serde::Deserialize;

use super::handlers::{upstream_error, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<DisplaySettings> {
    Json(state.session().display_settings())
}

/// PUT /api/v1/settings/language
///
/// Persist the language and reload the list under it.
pub async fn set_language(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<DisplaySettings>, (StatusCode, Json<ErrorResponse>)> {
    let language: Language = request.language.parse().map_err(|e: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: e }),
        )
    })?;

    let session = state.session();
    session
        .set_language(language)
        .await
        .map_err(upstream_error)?;
    Ok(Json(session.display_settings()))
}

/// POST /api/v1/settings/mute
///
/// Toggle audio mute for this session.
pub async fn toggle_mute(State(state): State<Arc<AppState>>) -> Json<DisplaySettings> {
    let session = state.session();
    session.toggle_mute();
    Json(session.display_settings())
}
