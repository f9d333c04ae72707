//! Prometheus metrics for vcr-proxy.
//!
//! Observational only: the admin statistics endpoint reads the in-memory
//! counters in `recording::stats`, never these.
use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec, Encoder,
    HistogramVec, TextEncoder,
};

lazy_static! {
    /// Proxied requests by mode and outcome
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "vcr_proxy_requests_total",
        "Total number of proxied requests",
        &["mode", "outcome"]  // outcome: recorded|hit|miss|bad_request|upstream_error|storage_error
    )
    .unwrap();

    /// End-to-end proxy request duration
    pub static ref REQUEST_DURATION_MS: HistogramVec = register_histogram_vec!(
        "vcr_proxy_request_duration_ms",
        "Total proxied request duration including lock wait",
        &["mode"],
        vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]
    )
    .unwrap();

    /// Upstream forward duration in record mode
    pub static ref UPSTREAM_DURATION_MS: HistogramVec = register_histogram_vec!(
        "vcr_proxy_upstream_duration_ms",
        "Duration of upstream forwards in record mode",
        &["status"],
        vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap();

    /// Mode switches through the admin API
    pub static ref MODE_SWITCHES_TOTAL: Counter = register_counter!(
        "vcr_proxy_mode_switches_total",
        "Number of accepted mode switch requests"
    )
    .unwrap();
}

/// Collect and return all metrics in Prometheus text format
pub fn collect_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_request(mode: &str, outcome: &str, duration_ms: f64) {
    REQUESTS_TOTAL.with_label_values(&[mode, outcome]).inc();
    REQUEST_DURATION_MS
        .with_label_values(&[mode])
        .observe(duration_ms);
}

pub fn record_upstream_duration(status: u16, duration_ms: f64) {
    UPSTREAM_DURATION_MS
        .with_label_values(&[&status.to_string()])
        .observe(duration_ms);
}

pub fn record_mode_switch() {
    MODE_SWITCHES_TOTAL.inc();
}
