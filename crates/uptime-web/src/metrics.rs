//! Prometheus metrics for the uptime node.
//!
//! Exposes the current uptime and request counts in Prometheus text format
//! at `/metrics`.

use crate::api::AppState;
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
};
use prometheus::{IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;
use uptime_core::rest::Status;

/// Prometheus metrics registry and collectors.
pub struct UptimeMetrics {
    /// The registry holding all metrics.
    registry: Registry,

    /// Uptime in seconds, refreshed on every scrape.
    pub uptime_seconds: IntGauge,

    /// Uptime resource requests by response status.
    pub requests_total: IntCounterVec,
}

impl std::fmt::Debug for UptimeMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UptimeMetrics")
            .field("uptime_seconds", &self.uptime_seconds.get())
            .finish_non_exhaustive()
    }
}

impl UptimeMetrics {
    /// Create a new metrics instance with a custom registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let uptime_seconds = IntGauge::new("node_uptime_seconds", "Node uptime in whole seconds")
            .expect("metric creation should succeed");

        let requests_total = IntCounterVec::new(
            Opts::new(
                "uptime_requests_total",
                "Uptime resource requests by response status",
            ),
            &["status"],
        )
        .expect("metric creation should succeed");

        registry
            .register(Box::new(uptime_seconds.clone()))
            .expect("registration should succeed");
        registry
            .register(Box::new(requests_total.clone()))
            .expect("registration should succeed");

        Self {
            registry,
            uptime_seconds,
            requests_total,
        }
    }

    /// Count one served request.
    pub fn record_request(&self, status: Status) {
        self.requests_total
            .with_label_values(&[&status.http_code().to_string()])
            .inc();
    }

    /// Publish the current uptime.
    pub fn set_uptime(&self, seconds: u64) {
        self.uptime_seconds
            .set(i64::try_from(seconds).unwrap_or(i64::MAX));
    }

    /// Render metrics in Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

impl Default for UptimeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics endpoint handler.
///
/// GET /metrics
pub async fn metrics_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(metrics): Extension<Arc<UptimeMetrics>>,
) -> impl IntoResponse {
    metrics.set_uptime(state.resource.clock().uptime_seconds());

    match metrics.render() {
        Ok(output) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = UptimeMetrics::new();
        assert_eq!(metrics.uptime_seconds.get(), 0);
    }

    #[test]
    fn test_record_request() {
        let metrics = UptimeMetrics::new();
        metrics.record_request(Status::Content);
        metrics.record_request(Status::Content);
        metrics.record_request(Status::NotAcceptable);

        assert_eq!(metrics.requests_total.with_label_values(&["200"]).get(), 2);
        assert_eq!(metrics.requests_total.with_label_values(&["406"]).get(), 1);
    }

    #[test]
    fn test_set_uptime_saturates() {
        let metrics = UptimeMetrics::new();
        metrics.set_uptime(90_061);
        assert_eq!(metrics.uptime_seconds.get(), 90_061);
        metrics.set_uptime(u64::MAX);
        assert_eq!(metrics.uptime_seconds.get(), i64::MAX);
    }

    #[test]
    fn test_render() {
        let metrics = UptimeMetrics::new();
        metrics.set_uptime(5);
        metrics.record_request(Status::Content);

        let output = metrics.render().expect("should render");
        assert!(output.contains("node_uptime_seconds 5"));
        assert!(output.contains("uptime_requests_total"));
    }
}
