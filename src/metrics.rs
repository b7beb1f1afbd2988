//! Prometheus metrics collection for storyrelay
//!
//! Tracks:
//! - Generation requests by route and outcome
//! - Completion provider latency by route
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use crate::prompts::GenerationKind;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Outcome label for requests that returned 200
pub const OUTCOME_SUCCESS: &str = "success";

/// Metrics collector for storyrelay
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    upstream_duration: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Outcome is either "success" or an AppError::kind() label, so
        // cardinality stays bounded: 2 routes x 8 outcomes.
        let requests_total = IntCounterVec::new(
            Opts::new(
                "storyrelay_requests_total",
                "Total number of generation requests by route and outcome",
            ),
            &["route", "outcome"],
        )?;

        let upstream_duration = HistogramVec::new(
            HistogramOpts::new(
                "storyrelay_upstream_duration_ms",
                "Completion provider call latency in milliseconds",
            )
            .buckets(vec![
                50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
            ]),
            &["route"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(upstream_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            upstream_duration,
        })
    }

    /// Count a finished generation request
    pub fn record_request(
        &self,
        kind: GenerationKind,
        outcome: &str,
    ) -> Result<(), prometheus::Error> {
        self.requests_total
            .get_metric_with_label_values(&[kind.as_str(), outcome])?
            .inc();
        Ok(())
    }

    /// Record how long the provider call took
    pub fn record_upstream_duration(
        &self,
        kind: GenerationKind,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "invalid upstream duration: {}ms",
                duration_ms
            )));
        }

        self.upstream_duration
            .get_metric_with_label_values(&[kind.as_str()])?
            .observe(duration_ms);
        Ok(())
    }

    /// Current request count for a route and outcome
    pub fn request_count(&self, kind: GenerationKind, outcome: &str) -> u64 {
        self.requests_total
            .get_metric_with_label_values(&[kind.as_str(), outcome])
            .map(|counter| counter.get())
            .unwrap_or(0)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    metric_family_count = metric_families.len(),
                    "Prometheus text encoder failed"
                );
                e
            })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Metrics output is not valid UTF-8: {}", e))
        })
    }
}
