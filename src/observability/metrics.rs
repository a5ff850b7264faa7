//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_payments_total` (counter): dispatch outcomes by processor
//!   and outcome label
//! - `gateway_queue_rejections_total` (counter): admissions refused at
//!   capacity
//! - `gateway_persistence_inconsistencies_total` (counter): settled
//!   payments whose record write failed, the operator-facing channel
//!   for the fatal-class gap
//! - `gateway_health_probe_failures_total` (counter): absorbed probe
//!   failures by processor
//! - `gateway_processor_failing` / `gateway_processor_min_response_time_ms`
//!   (gauges): latest snapshot per processor

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(error) => tracing::error!(error = %error, "failed to install metrics exporter"),
    }
}

pub fn record_payment(processor: &str, outcome: &'static str) {
    metrics::counter!(
        "gateway_payments_total",
        "processor" => processor.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_admission_rejected() {
    metrics::counter!("gateway_queue_rejections_total").increment(1);
}

pub fn record_persistence_inconsistency() {
    metrics::counter!("gateway_persistence_inconsistencies_total").increment(1);
}

pub fn record_probe_failure(processor: &str) {
    metrics::counter!(
        "gateway_health_probe_failures_total",
        "processor" => processor.to_string()
    )
    .increment(1);
}

pub fn record_processor_health(processor: &str, failing: bool, min_response_time_ms: u64) {
    metrics::gauge!(
        "gateway_processor_failing",
        "processor" => processor.to_string()
    )
    .set(if failing { 1.0 } else { 0.0 });
    metrics::gauge!(
        "gateway_processor_min_response_time_ms",
        "processor" => processor.to_string()
    )
    .set(min_response_time_ms as f64);
}
