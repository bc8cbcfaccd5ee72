//! Prometheus Metrics Module
//!
//! Provides gateway-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Mount table dispatches by handler group and outcome
//! - Upstream request latency histograms by service

use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Dispatch counter - tracks which handler group served each request
pub static MOUNT_DISPATCH_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mount_dispatch_total", "Requests dispatched by the mount table")
            .namespace("docsign_web"),
        &["group", "outcome"],
    )
    .expect("Failed to create MOUNT_DISPATCH_TOTAL metric")
});

/// Upstream latency histogram - tracks sub-service round trips in seconds
pub static UPSTREAM_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "upstream_request_duration_seconds",
            "Upstream request latency in seconds",
        )
        .namespace("docsign_web")
        .buckets(buckets),
        &["service"],
    )
    .expect("Failed to create UPSTREAM_REQUEST_DURATION_SECONDS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(MOUNT_DISPATCH_TOTAL.clone()))
        .expect("Failed to register MOUNT_DISPATCH_TOTAL");
    registry
        .register(Box::new(UPSTREAM_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register UPSTREAM_REQUEST_DURATION_SECONDS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record which group a request was dispatched to (`unmatched` when none)
pub fn record_dispatch(group: &str, outcome: &str) {
    MOUNT_DISPATCH_TOTAL
        .with_label_values(&[group, outcome])
        .inc();
}

/// Record one upstream round trip
pub fn record_upstream_request(service: &str, duration_secs: f64) {
    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[service])
        .observe(duration_secs);
}
