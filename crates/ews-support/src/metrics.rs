//! Prometheus metrics collection, shared by all three service binaries.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use std::sync::Arc;

/// HTTP request labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabels {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path pattern.
    pub path: String,
    /// Response status code.
    pub status: u16,
}

/// Consensus outcome labels, shared by the sensor- and score-consensus counters.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ConsensusLabels {
    /// `"sensor"` or `"score"`.
    pub kind: String,
    /// The reduction method the quorum settled on.
    pub method: String,
}

/// Alert dispatch labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct DispatchLabels {
    /// Notification channel (`email`, `webhook`, `sms`).
    pub channel: String,
    /// `"sent"` or `"failed"`.
    pub outcome: String,
}

/// Global metrics state, lazily constructed on first access.
pub static METRICS: Lazy<MetricsState> = Lazy::new(MetricsState::new);

/// Metrics state container, registered once per process.
#[derive(Clone)]
pub struct MetricsState {
    /// Prometheus registry.
    pub registry: Arc<RwLock<Registry>>,
    /// HTTP request counter.
    pub http_requests_total: Family<HttpLabels, Counter>,
    /// HTTP request duration histogram (seconds).
    pub http_request_duration_seconds: Family<HttpLabels, Histogram>,
    /// Sensor readings ingested counter.
    pub sensor_readings_total: Counter,
    /// Consensus outcomes counter, labeled by kind and method.
    pub consensus_outcomes_total: Family<ConsensusLabels, Counter>,
    /// Alerts raised counter.
    pub alerts_raised_total: Counter,
    /// Notification dispatch counter, labeled by channel and outcome.
    pub notifications_dispatched_total: Family<DispatchLabels, Counter>,
    /// Patients currently tracked as high risk.
    pub high_risk_patients: Gauge,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsState {
    /// Create a new metrics state with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_requests_total = Family::<HttpLabels, Counter>::default();
        registry.register(
            "ews_http_requests",
            "Total HTTP requests",
            http_requests_total.clone(),
        );

        let http_request_duration_seconds =
            Family::<HttpLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.001, 2.0, 16))
            });
        registry.register(
            "ews_http_request_duration_seconds",
            "HTTP request duration in seconds",
            http_request_duration_seconds.clone(),
        );

        let sensor_readings_total = Counter::default();
        registry.register(
            "ews_sensor_readings",
            "Total sensor readings ingested",
            sensor_readings_total.clone(),
        );

        let consensus_outcomes_total = Family::<ConsensusLabels, Counter>::default();
        registry.register(
            "ews_consensus_outcomes",
            "Consensus computations by kind and reduction method",
            consensus_outcomes_total.clone(),
        );

        let alerts_raised_total = Counter::default();
        registry.register(
            "ews_alerts_raised",
            "Total alerts raised",
            alerts_raised_total.clone(),
        );

        let notifications_dispatched_total = Family::<DispatchLabels, Counter>::default();
        registry.register(
            "ews_notifications_dispatched",
            "Notification deliveries by channel and outcome",
            notifications_dispatched_total.clone(),
        );

        let high_risk_patients = Gauge::default();
        registry.register(
            "ews_high_risk_patients",
            "Current count of patients with high clinical risk",
            high_risk_patients.clone(),
        );

        Self {
            registry: Arc::new(RwLock::new(registry)),
            http_requests_total,
            http_request_duration_seconds,
            sensor_readings_total,
            consensus_outcomes_total,
            alerts_raised_total,
            notifications_dispatched_total,
            high_risk_patients,
        }
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let labels = HttpLabels {
            method: method.to_string(),
            path: normalize_path(path),
            status,
        };
        self.http_requests_total.get_or_create(&labels).inc();
        self.http_request_duration_seconds
            .get_or_create(&labels)
            .observe(duration_secs);
    }

    /// Record a consensus computation outcome.
    pub fn record_consensus(&self, kind: &str, method: &str) {
        self.consensus_outcomes_total
            .get_or_create(&ConsensusLabels {
                kind: kind.to_string(),
                method: method.to_string(),
            })
            .inc();
    }

    /// Record a notification dispatch attempt.
    pub fn record_dispatch(&self, channel: &str, outcome: &str) {
        self.notifications_dispatched_total
            .get_or_create(&DispatchLabels {
                channel: channel.to_string(),
                outcome: outcome.to_string(),
            })
            .inc();
    }

    /// Encode metrics in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        let registry = self.registry.read();
        prometheus_client::encoding::text::encode(&mut buffer, &registry)
            .expect("metrics encoding is infallible for registered types");
        buffer
    }
}

/// Collapse path parameters (UUIDs, patient ids) to `:param` so cardinality stays bounded.
fn normalize_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();
    let normalized: Vec<&str> = parts
        .iter()
        .map(|part| {
            if part.is_empty() || !is_dynamic_segment(part) {
                *part
            } else {
                ":param"
            }
        })
        .collect();
    normalized.join("/")
}

fn is_dynamic_segment(segment: &str) -> bool {
    if segment.len() == 36 && segment.contains('-') {
        return true;
    }
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_collapses_ids() {
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(
            normalize_path("/api/data/patient/alice-123"),
            "/api/data/patient/alice-123"
        );
        assert_eq!(
            normalize_path("/api/query/patient/7"),
            "/api/query/patient/:param"
        );
    }

    #[test]
    fn metrics_state_encodes_registered_metrics() {
        let metrics = MetricsState::new();
        metrics.record_http_request("GET", "/health", 200, 0.001);
        metrics.record_consensus("sensor", "majority");
        metrics.record_dispatch("email", "sent");
        let encoded = metrics.encode();
        assert!(encoded.contains("ews_http_requests"));
        assert!(encoded.contains("ews_consensus_outcomes"));
        assert!(encoded.contains("ews_notifications_dispatched"));
    }
}
