//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Upstream catalog requests (count and latency per endpoint)
//! - Absorbed enrichment failures on list pages and detail records
//! - Search resolutions by outcome

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// =============================================================================
// Upstream Metrics
// =============================================================================

/// Upstream requests total by endpoint and outcome.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pokedex_upstream_requests_total",
            "Total requests issued to the upstream catalog API",
        ),
        // outcome: ok, not_found, upstream_error, transport_error, parse_error
        &["endpoint", "outcome"],
    )
    .unwrap()
});

/// Upstream request duration in seconds.
pub static UPSTREAM_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_upstream_request_duration_seconds",
            "Duration of upstream catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"],
    )
    .unwrap()
});

// =============================================================================
// Enrichment Metrics
// =============================================================================

/// Secondary lookups that failed and were replaced by defaults.
pub static ENRICHMENT_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pokedex_enrichment_failures_total",
            "Secondary lookups that failed and were substituted with defaults",
        ),
        &["kind"], // "list_types", "species"
    )
    .unwrap()
});

// =============================================================================
// Search Metrics
// =============================================================================

/// Search resolutions by outcome.
pub static SEARCH_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pokedex_search_resolutions_total",
            "Search resolutions applied to the session",
        ),
        &["outcome"], // "identifier", "exact_name", "substring", "not_found", "error"
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

/// Register all core metrics with the given registry.
pub fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(UPSTREAM_REQUESTS.clone()))
        .ok();
    registry
        .register(Box::new(UPSTREAM_REQUEST_DURATION.clone()))
        .ok();
    registry
        .register(Box::new(ENRICHMENT_FAILURES.clone()))
        .ok();
    registry
        .register(Box::new(SEARCH_RESOLUTIONS.clone()))
        .ok();
}
