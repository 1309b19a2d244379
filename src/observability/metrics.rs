//! Metrics collection and exposition.
//!
//! # Metrics
//! - `auth_failures_total` (counter): failures entering the pipeline, by classification
//! - `auth_validation_rejections_total` (counter): 422 responses, by route
//! - `auth_alerts_total` (counter): alert dispatch outcomes
//! - `auth_error_log_writes_total` (counter): error log append outcomes

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::pipeline::Classification;

const FAILURES_TOTAL: &str = "auth_failures_total";
const VALIDATION_REJECTIONS_TOTAL: &str = "auth_validation_rejections_total";
const ALERTS_TOTAL: &str = "auth_alerts_total";
const ERROR_LOG_WRITES_TOTAL: &str = "auth_error_log_writes_total";

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(metrics_addr = %addr, "Prometheus metrics exporter started");
    Ok(())
}

#[inline]
pub fn record_failure(classification: Classification) {
    counter!(FAILURES_TOTAL, "classification" => classification.label()).increment(1);
}

#[inline]
pub fn record_validation_rejection(route: &'static str) {
    counter!(VALIDATION_REJECTIONS_TOTAL, "route" => route).increment(1);
}

#[inline]
pub fn record_alert(outcome: &'static str) {
    counter!(ALERTS_TOTAL, "outcome" => outcome).increment(1);
}

#[inline]
pub fn record_error_log_write(outcome: &'static str) {
    counter!(ERROR_LOG_WRITES_TOTAL, "outcome" => outcome).increment(1);
}
