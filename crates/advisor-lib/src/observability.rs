//! Observability infrastructure for the resource advisor
//!
//! Provides:
//! - Prometheus metrics (evaluation latency, suggestion counts by severity)
//! - Structured JSON logging with tracing

use crate::ranking::SuggestionSummary;
use crate::severity::Severity;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for engine evaluation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<AdvisorMetricsInner> = OnceLock::new();

struct AdvisorMetricsInner {
    evaluation_latency_seconds: Histogram,
    evaluations_total: IntCounter,
    suggestions_total: IntCounterVec,
    last_workloads_evaluated: IntGauge,
    rejected_requests: IntCounter,
}

impl AdvisorMetricsInner {
    fn new() -> Self {
        Self {
            evaluation_latency_seconds: register_histogram!(
                "kubeadjust_evaluation_latency_seconds",
                "Time spent computing suggestions for one snapshot",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register evaluation_latency_seconds"),

            evaluations_total: register_int_counter!(
                "kubeadjust_evaluations_total",
                "Total number of snapshots evaluated"
            )
            .expect("Failed to register evaluations_total"),

            suggestions_total: register_int_counter_vec!(
                "kubeadjust_suggestions_total",
                "Total number of suggestions computed, by severity",
                &["severity"]
            )
            .expect("Failed to register suggestions_total"),

            last_workloads_evaluated: register_int_gauge!(
                "kubeadjust_last_workloads_evaluated",
                "Number of workloads in the most recent snapshot"
            )
            .expect("Failed to register last_workloads_evaluated"),

            rejected_requests: register_int_counter!(
                "kubeadjust_rejected_requests_total",
                "Total number of requests rejected as invalid"
            )
            .expect("Failed to register rejected_requests"),
        }
    }
}

/// Advisor metrics for Prometheus exposition
///
/// A lightweight handle to the global metrics instance. Multiple clones
/// share the same underlying metrics.
#[derive(Clone)]
pub struct AdvisorMetrics {
    _private: (),
}

impl Default for AdvisorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &AdvisorMetricsInner {
        GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new)
    }

    /// Record one completed evaluation, counting suggestions before display filters
    pub fn record_evaluation(
        &self,
        duration_secs: f64,
        workloads: usize,
        summary: &SuggestionSummary,
    ) {
        let inner = self.inner();
        inner.evaluation_latency_seconds.observe(duration_secs);
        inner.evaluations_total.inc();
        inner.last_workloads_evaluated.set(workloads as i64);
        for severity in Severity::ALL {
            inner
                .suggestions_total
                .with_label_values(&[severity.as_str()])
                .inc_by(summary.count(severity) as u64);
        }
    }

    pub fn inc_rejected_requests(&self) {
        self.inner().rejected_requests.inc();
    }
}

/// Structured logger for advisor events
///
/// Provides consistent JSON-formatted logging for evaluations and
/// lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a completed evaluation
    pub fn log_evaluation(
        &self,
        namespace: Option<&str>,
        workloads: usize,
        history_entries: usize,
        summary: &SuggestionSummary,
    ) {
        if summary.danger > 0 {
            warn!(
                event = "suggestions_evaluated",
                instance = %self.instance,
                namespace = namespace.unwrap_or("-"),
                workloads = workloads,
                history_entries = history_entries,
                danger = summary.danger,
                warning = summary.warning,
                overkill = summary.overkill,
                "Workloads near their limits"
            );
        } else {
            info!(
                event = "suggestions_evaluated",
                instance = %self.instance,
                namespace = namespace.unwrap_or("-"),
                workloads = workloads,
                history_entries = history_entries,
                danger = summary.danger,
                warning = summary.warning,
                overkill = summary.overkill,
                "Suggestions evaluated"
            );
        }
    }

    /// Log a rejected request
    pub fn log_rejected(&self, reason: &str) {
        warn!(
            event = "request_rejected",
            instance = %self.instance,
            reason = %reason,
            "Rejected advisor request"
        );
    }

    /// Log advisor startup
    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "advisor_started",
            instance = %self.instance,
            version = %version,
            addr = %addr,
            "Resource advisor started"
        );
    }

    /// Log advisor shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "advisor_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Resource advisor shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_metrics_creation() {
        let metrics = AdvisorMetrics::new();
        let summary = SuggestionSummary {
            danger: 1,
            warning: 2,
            overkill: 0,
            total: 3,
        };
        metrics.record_evaluation(0.0004, 3, &summary);
        metrics.inc_rejected_requests();

        let counted = metrics
            .inner()
            .suggestions_total
            .with_label_values(&["warning"])
            .get();
        assert!(counted >= 2);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("advisor-0");
        assert_eq!(logger.instance, "advisor-0");
    }
}
