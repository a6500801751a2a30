//! Prometheus Metrics Module
//!
//! # Metrics Collected
//! - HTTP request counts by method, route, and status
//! - HTTP request latency histograms
//! - Social actions by kind and outcome (follow/like toggles, notifications,
//!   messages)
//! - Event publish failures by event
//! - Database pool gauges

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "linkme";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "route", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "route"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Social actions, e.g. `("like_toggle", "liked")` or `("notification", "suppressed")`
pub static SOCIAL_ACTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("social_actions_total", "Social graph and content actions by outcome")
            .namespace(NAMESPACE),
        &["action", "outcome"],
    )
    .expect("Failed to create SOCIAL_ACTIONS_TOTAL metric")
});

/// Failed event publishes
pub static EVENT_PUBLISH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("event_publish_failures_total", "Events that could not be published")
            .namespace(NAMESPACE),
        &["event"],
    )
    .expect("Failed to create EVENT_PUBLISH_FAILURES_TOTAL metric")
});

/// Database connection pool stats
pub static DB_POOL_CONNECTIONS: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new("db_pool_connections", "Database connection pool statistics")
            .namespace(NAMESPACE),
        &["state"], // "idle", "active"
    )
    .expect("Failed to create DB_POOL_CONNECTIONS metric")
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(SOCIAL_ACTIONS_TOTAL.clone()))
        .expect("Failed to register SOCIAL_ACTIONS_TOTAL");
    registry
        .register(Box::new(EVENT_PUBLISH_FAILURES_TOTAL.clone()))
        .expect("Failed to register EVENT_PUBLISH_FAILURES_TOTAL");
    registry
        .register(Box::new(DB_POOL_CONNECTIONS.clone()))
        .expect("Failed to register DB_POOL_CONNECTIONS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record one handled HTTP request
pub fn record_http_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    Lazy::force(&REGISTRY);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, route, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, route])
        .observe(duration_secs);
}

/// Record one social action outcome
pub fn record_social_action(action: &str, outcome: &str) {
    Lazy::force(&REGISTRY);
    SOCIAL_ACTIONS_TOTAL
        .with_label_values(&[action, outcome])
        .inc();
}

/// Record a failed event publish
pub fn record_publish_failure(event: &str) {
    Lazy::force(&REGISTRY);
    EVENT_PUBLISH_FAILURES_TOTAL.with_label_values(&[event]).inc();
}

/// Update database pool stats
pub fn update_db_pool_stats(idle: u32, active: u32) {
    Lazy::force(&REGISTRY);
    DB_POOL_CONNECTIONS
        .with_label_values(&["idle"])
        .set(idle as f64);
    DB_POOL_CONNECTIONS
        .with_label_values(&["active"])
        .set(active as f64);
}
