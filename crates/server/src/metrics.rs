//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Pokédex server:
//! - HTTP request metrics (latency, counts)
//! - Session state (index size, accumulated list entries), collected dynamically
//! - Core metrics (upstream requests, enrichment failures, search outcomes)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pokedex_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Session Metrics (collected dynamically)
// =============================================================================

/// Entries in the full catalog index (0 until populated).
pub static INDEX_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pokedex_index_entries",
        "Number of entries in the catalog index",
    )
    .unwrap()
});

/// Entries accumulated by the paginated list.
pub static LIST_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pokedex_list_entries",
        "Number of entries accumulated in the paginated list",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .ok();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .ok();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .ok();

    // Session
    registry.register(Box::new(INDEX_ENTRIES.clone())).ok();
    registry.register(Box::new(LIST_ENTRIES.clone())).ok();

    // Core metrics (upstream, enrichment, search)
    pokedex_core::metrics::register_metrics(registry);
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the live session.
pub async fn collect_dynamic_metrics(state: &AppState) {
    let session = state.session();

    let indexed = session.index().snapshot().map_or(0, |s| s.len());
    INDEX_ENTRIES.set(indexed as i64);

    let listed = session.view().await.entries.len();
    LIST_ENTRIES.set(listed as i64);
}

/// Normalize a path for metric labels (replace identifiers with placeholders).
pub fn normalize_path(path: &str) -> String {
    let mut previous = "";
    let segments: Vec<&str> = path
        .split('/')
        .map(|segment| {
            let keyed = matches!(previous, "pokemon" | "assets");
            previous = segment;
            if !segment.is_empty()
                && (keyed || segment.bytes().all(|b| b.is_ascii_digit()))
            {
                "{id}"
            } else {
                segment
            }
        })
        .collect();
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        let path = "/api/v1/assets/25";
        assert_eq!(normalize_path(path), "/api/v1/assets/{id}");
    }

    #[test]
    fn test_normalize_path_name() {
        let path = "/api/v1/pokemon/pikachu";
        assert_eq!(normalize_path(path), "/api/v1/pokemon/{id}");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(
            normalize_path("/api/v1/entries/load-more"),
            "/api/v1/entries/load-more"
        );
    }

    #[test]
    fn test_encode_includes_core_metrics() {
        pokedex_core::metrics::SEARCH_RESOLUTIONS
            .with_label_values(&["not_found"])
            .inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("pokedex_search_resolutions_total"));
    }
}
