//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Application record transitions (created, updated, submitted, rejected)
//! - Document uploads by slot and outcome, and uploaded bytes

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "visa_intake";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Record service operations by outcome
pub static APPLICATION_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "application_events_total",
            "Application record operations by operation and outcome",
        )
        .namespace(NAMESPACE),
        &["operation", "outcome"], // "created", "updated", "submitted" / "ok", "rejected"
    )
    .expect("Failed to create APPLICATION_EVENTS_TOTAL metric")
});

/// Uploads by document slot and outcome
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("uploads_total", "Document uploads by slot and outcome").namespace(NAMESPACE),
        &["slot", "outcome"],
    )
    .expect("Failed to create UPLOADS_TOTAL metric")
});

/// Total bytes accepted by storage
pub static UPLOADED_BYTES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("uploaded_bytes_total", "Bytes written to document storage").namespace(NAMESPACE),
    )
    .expect("Failed to create UPLOADED_BYTES_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(APPLICATION_EVENTS_TOTAL.clone()))
        .expect("Failed to register APPLICATION_EVENTS_TOTAL");
    registry
        .register(Box::new(UPLOADS_TOTAL.clone()))
        .expect("Failed to register UPLOADS_TOTAL");
    registry
        .register(Box::new(UPLOADED_BYTES_TOTAL.clone()))
        .expect("Failed to register UPLOADED_BYTES_TOTAL");
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

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record a record service operation
pub fn record_application_event(operation: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "rejected" };
    APPLICATION_EVENTS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Helper to record an upload attempt
pub fn record_upload(slot: &str, bytes: Option<u64>) {
    match bytes {
        Some(n) => {
            UPLOADS_TOTAL.with_label_values(&[slot, "ok"]).inc();
            UPLOADED_BYTES_TOTAL.inc_by(n);
        }
        None => UPLOADS_TOTAL.with_label_values(&[slot, "rejected"]).inc(),
    }
}
