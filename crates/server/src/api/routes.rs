use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{entries, handlers, middleware::metrics_middleware, pokemon, settings};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // List screen
        .route("/entries", get(entries::get_entries))
        .route("/entries/load-more", post(entries::load_more))
        .route("/entries/refresh", post(entries::refresh))
        .route("/query", put(entries::set_query))
        .route("/sort", put(entries::set_sort))
        // Detail screen
        .route("/pokemon/{id_or_name}", get(pokemon::get_pokemon))
        .route("/assets/{id}", get(pokemon::get_assets))
        // Display settings
        .route("/settings", get(settings::get_settings))
        .route("/settings/language", put(settings::set_language))
        .route("/settings/mute", post(settings::toggle_mute))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
