//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Upstream Metrics
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("portfolio_upstream_requests_total", "Total number of requests to upstream APIs"),
        &["service", "status"]
    ).expect("metric can be created");
    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "portfolio_upstream_request_duration_seconds",
            "Upstream request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service"]
    ).expect("metric can be created");
    pub static ref LITERAL_RELOGINS_TOTAL: IntCounter = IntCounter::new(
        "portfolio_literal_relogins_total",
        "Number of times an expired Literal token was renewed"
    ).expect("metric can be created");

    // Cache Metrics
    pub static ref CACHE_HITS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("portfolio_cache_hits_total", "Total number of snapshot cache hits"),
        &["cache_name"]
    ).expect("metric can be created");
    pub static ref CACHE_MISSES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("portfolio_cache_misses_total", "Total number of snapshot cache misses"),
        &["cache_name"]
    ).expect("metric can be created");

    // Storage Metrics
    pub static ref COVER_DOWNLOADS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("portfolio_cover_downloads_total", "Total number of cover download attempts"),
        &["status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("portfolio_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(UPSTREAM_REQUESTS_TOTAL.clone()))
        .expect("UPSTREAM_REQUESTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()))
        .expect("UPSTREAM_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(LITERAL_RELOGINS_TOTAL.clone()))
        .expect("LITERAL_RELOGINS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(CACHE_HITS_TOTAL.clone()))
        .expect("CACHE_HITS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(CACHE_MISSES_TOTAL.clone()))
        .expect("CACHE_MISSES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(COVER_DOWNLOADS_TOTAL.clone()))
        .expect("COVER_DOWNLOADS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}

/// Record the outcome and latency of one upstream call
pub(crate) fn observe_upstream(service: &str, status: &str, started: std::time::Instant) {
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[service, status])
        .inc();
    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[service])
        .observe(started.elapsed().as_secs_f64());
}
