//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes only the counters the intake flows report on.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use serde::Serialize;

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    option_cache_refreshes_total: IntCounterVec,
    option_resolutions_total: IntCounterVec,
    attachment_uploads_total: IntCounterVec,
    option_cache_fields: IntGauge,
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Number of enumerated fields currently cached.
    pub option_cache_fields: i64,
    /// Refreshes that completed successfully.
    pub option_cache_refreshes_ok: u64,
    /// Refreshes that failed and left the cache empty.
    pub option_cache_refreshes_failed: u64,
    /// Attachment uploads that failed.
    pub attachment_uploads_failed: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )?;
        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency by route",
            )
            .buckets(vec![0.05, 0.25, 1.0, 5.0, 30.0, 120.0, 300.0]),
            &["route"],
        )?;
        let option_cache_refreshes_total = IntCounterVec::new(
            Opts::new(
                "option_cache_refreshes_total",
                "Option cache refreshes by outcome",
            ),
            &["outcome"],
        )?;
        let option_resolutions_total = IntCounterVec::new(
            Opts::new(
                "option_resolutions_total",
                "Free-text to option resolutions by outcome",
            ),
            &["outcome"],
        )?;
        let attachment_uploads_total = IntCounterVec::new(
            Opts::new(
                "attachment_uploads_total",
                "Attachment uploads by kind and outcome",
            ),
            &["kind", "outcome"],
        )?;
        let option_cache_fields = IntGauge::with_opts(Opts::new(
            "option_cache_fields",
            "Enumerated fields currently held in the option cache",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(option_cache_refreshes_total.clone()))?;
        registry.register(Box::new(option_resolutions_total.clone()))?;
        registry.register(Box::new(attachment_uploads_total.clone()))?;
        registry.register(Box::new(option_cache_fields.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                option_cache_refreshes_total,
                option_resolutions_total,
                attachment_uploads_total,
                option_cache_fields,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Record how long a request on `route` took.
    pub fn observe_http_latency(&self, route: &str, elapsed: Duration) {
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[route])
            .observe(elapsed.as_secs_f64());
    }

    /// Record the outcome of an option cache refresh (`ok` or `failed`).
    pub fn inc_option_cache_refresh(&self, outcome: &str) {
        self.inner
            .option_cache_refreshes_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Record the outcome of a dropdown resolution.
    pub fn inc_option_resolution(&self, outcome: &str) {
        self.inner
            .option_resolutions_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Record an attachment upload attempt (`video`, `guarantee`, ...).
    pub fn inc_attachment_upload(&self, kind: &str, outcome: &str) {
        self.inner
            .attachment_uploads_total
            .with_label_values(&[kind, outcome])
            .inc();
    }

    /// Set the number of enumerated fields currently cached.
    pub fn set_option_cache_fields(&self, count: usize) {
        self.inner
            .option_cache_fields
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode Prometheus metrics")?;
        String::from_utf8(buffer).context("metrics output was not valid UTF-8")
    }

    /// Take a point-in-time snapshot of the most relevant gauges and counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let refreshes = &self.inner.option_cache_refreshes_total;
        let uploads = &self.inner.attachment_uploads_total;
        MetricsSnapshot {
            option_cache_fields: self.inner.option_cache_fields.get(),
            option_cache_refreshes_ok: refreshes.with_label_values(&["ok"]).get(),
            option_cache_refreshes_failed: refreshes.with_label_values(&["failed"]).get(),
            attachment_uploads_failed: uploads.with_label_values(&["video", "failed"]).get()
                + uploads.with_label_values(&["guarantee", "failed"]).get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_snapshot_reflects_updates() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_http_request("/health", 200);
        metrics.observe_http_latency("/health", Duration::from_millis(3));
        metrics.inc_option_cache_refresh("ok");
        metrics.inc_option_cache_refresh("failed");
        metrics.inc_option_cache_refresh("failed");
        metrics.inc_option_resolution("matched");
        metrics.inc_attachment_upload("video", "failed");
        metrics.inc_attachment_upload("guarantee", "failed");
        metrics.inc_attachment_upload("guarantee", "ok");
        metrics.set_option_cache_fields(4);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.option_cache_fields, 4);
        assert_eq!(snapshot.option_cache_refreshes_ok, 1);
        assert_eq!(snapshot.option_cache_refreshes_failed, 2);
        assert_eq!(snapshot.attachment_uploads_failed, 2);

        let rendered = metrics.render()?;
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("http_request_duration_seconds_bucket"));
        assert!(rendered.contains("option_resolutions_total"));
        assert!(rendered.contains("attachment_uploads_total"));
        Ok(())
    }

    #[test]
    fn snapshot_serializes_for_health_output() -> Result<()> {
        let metrics = Metrics::new()?;
        let value = serde_json::to_value(metrics.snapshot())?;
        assert_eq!(value["option_cache_fields"], 0);
        Ok(())
    }
}
