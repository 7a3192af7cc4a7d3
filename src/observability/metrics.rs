//! Prometheus metrics.
//!
//! Provides metrics for:
//! - HTTP request latency and counts
//! - API key verification outcomes by denial code
//! - Entity lookups by endpoint

#[cfg(feature = "prometheus")]
use std::sync::OnceLock;

#[cfg(feature = "prometheus")]
use metrics::{counter, histogram};
#[cfg(feature = "prometheus")]
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::MetricsConfig;

/// Global Prometheus handle for the metrics endpoint.
#[cfg(feature = "prometheus")]
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Latency buckets in seconds.
#[cfg(feature = "prometheus")]
const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];

/// Initialize the metrics system with the given configuration.
#[cfg(feature = "prometheus")]
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Ok(());
    }

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            metrics_exporter_prometheus::Matcher::Suffix("_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )
        .map_err(|e| MetricsError::Setup(e.to_string()))?;

    let handle = builder.install_recorder().map_err(MetricsError::Install)?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::Setup("Metrics already initialized".to_string()))?;

    Ok(())
}

/// Initialize the metrics system (no-op without prometheus feature).
#[cfg(not(feature = "prometheus"))]
pub fn init_metrics(_config: &MetricsConfig) -> Result<(), MetricsError> {
    Ok(())
}

/// Get the Prometheus handle for rendering metrics.
#[cfg(feature = "prometheus")]
pub fn get_prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

// ─────────────────────────────────────────────────────────────────────────────
// Metric Recording Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    #[cfg(feature = "prometheus")]
    {
        let status_str = status.to_string();
        let status_class = format!("{}xx", status / 100);

        counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string(), "status" => status_str, "status_class" => status_class.clone())
            .increment(1);

        histogram!("http_request_duration_seconds", "method" => method.to_string(), "path" => path.to_string(), "status_class" => status_class)
            .record(duration_secs);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = (method, path, status, duration_secs);
    }
}

/// Record a verification outcome.
///
/// `outcome` is `authorized`, `denied` or `error`; `code` is the denial code,
/// `ok`, or the error class.
pub fn record_verification(outcome: &str, code: &str, duration_secs: f64) {
    #[cfg(feature = "prometheus")]
    {
        counter!(
            "apikey_verifications_total",
            "outcome" => outcome.to_string(),
            "code" => code.to_string()
        )
        .increment(1);

        histogram!("apikey_verification_duration_seconds", "outcome" => outcome.to_string())
            .record(duration_secs);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = (outcome, code, duration_secs);
    }
}

/// Record an entity lookup by endpoint and result (`ok`, `invalid_identifiers`,
/// `not_found` or `error`).
pub fn record_entity_lookup(endpoint: &str, status: &str) {
    #[cfg(feature = "prometheus")]
    {
        counter!(
            "entity_lookups_total",
            "endpoint" => endpoint.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = (endpoint, status);
    }
}

/// Record a data snapshot switch.
pub fn record_snapshot_install(version: &str) {
    #[cfg(feature = "prometheus")]
    {
        counter!("snapshot_installs_total", "version" => version.to_string()).increment(1);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = version;
    }
}

/// Metrics initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to set up metrics: {0}")]
    Setup(String),

    #[cfg(feature = "prometheus")]
    #[error("Failed to install metrics recorder: {0}")]
    Install(#[from] metrics_exporter_prometheus::BuildError),
}
