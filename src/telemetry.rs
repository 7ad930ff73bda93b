//! Telemetry and observability utilities

#[cfg(feature = "metrics")]
use opentelemetry::{
    metrics::{Counter, Histogram},
    KeyValue,
};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Whether telemetry is enabled
    pub enabled: bool,
    /// Service name for metrics
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: "mainstay-sdk".to_string(),
        }
    }
}

/// SDK metrics collector
#[derive(Clone)]
pub struct Metrics {
    #[cfg(feature = "metrics")]
    enabled: bool,

    #[cfg(feature = "metrics")]
    pub(crate) requests_total: Counter<u64>,

    #[cfg(feature = "metrics")]
    pub(crate) request_duration: Histogram<f64>,

    #[cfg(feature = "metrics")]
    pub(crate) errors_total: Counter<u64>,
}

impl Metrics {
    /// Create new metrics instance
    #[cfg(feature = "metrics")]
    pub fn new(config: &TelemetryConfig) -> Self {
        use opentelemetry::global;

        let meter = global::meter(config.service_name.clone());

        let requests_total = meter
            .u64_counter("mainstay_sdk.requests_total")
            .with_description("Total number of requests made")
            .init();

        let request_duration = meter
            .f64_histogram("mainstay_sdk.request_duration_seconds")
            .with_description("Request duration in seconds")
            .init();

        let errors_total = meter
            .u64_counter("mainstay_sdk.errors_total")
            .with_description("Total number of failed requests")
            .init();

        Self {
            enabled: config.enabled,
            requests_total,
            request_duration,
            errors_total,
        }
    }

    /// Create a no-op metrics instance when feature is disabled
    #[cfg(not(feature = "metrics"))]
    pub fn new(_config: &TelemetryConfig) -> Self {
        Self {}
    }

    /// Record a completed request
    #[cfg(feature = "metrics")]
    pub fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        if !self.enabled {
            return;
        }
        let labels = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("path", path.to_string()),
            KeyValue::new("status", status.to_string()),
        ];

        self.requests_total.add(1, labels);
        self.request_duration.record(duration_secs, labels);

        if status >= 400 {
            self.errors_total.add(
                1,
                &[
                    KeyValue::new("type", if status >= 500 { "server" } else { "client" }),
                    KeyValue::new("status", status.to_string()),
                ],
            );
        }
    }

    /// Record a completed request (no-op when metrics disabled)
    #[cfg(not(feature = "metrics"))]
    pub fn record_request(&self, _method: &str, _path: &str, _status: u16, _duration_secs: f64) {}

    /// Record a request that failed before a status was received
    #[cfg(feature = "metrics")]
    pub fn record_transport_error(&self, method: &str, path: &str) {
        if !self.enabled {
            return;
        }
        self.errors_total.add(
            1,
            &[
                KeyValue::new("type", "transport"),
                KeyValue::new("method", method.to_string()),
                KeyValue::new("path", path.to_string()),
            ],
        );
    }

    /// Record a transport failure (no-op when metrics disabled)
    #[cfg(not(feature = "metrics"))]
    pub fn record_transport_error(&self, _method: &str, _path: &str) {}
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("enabled", &cfg!(feature = "metrics"))
            .finish()
    }
}
