//! Health check endpoints for Kubernetes probes and monitoring.

use std::time::Instant;

use axum::{Json, extract::State, response::IntoResponse};
use http::StatusCode;
use serde::Serialize;

use crate::AppState;
#[cfg(feature = "prometheus")]
use crate::observability::metrics::get_prometheus_handle;

/// Detailed health status response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Service version
    pub version: String,
    /// Version label of the data snapshot being served
    pub snapshot: String,
    /// Individual subsystem statuses
    pub subsystems: SubsystemStatus,
}

/// Status of individual subsystems.
#[derive(Debug, Serialize)]
pub struct SubsystemStatus {
    pub database: ComponentStatus,
    /// Absent when no secrets backend is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<ComponentStatus>,
}

/// Status of a single component.
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

impl ComponentStatus {
    fn from_check(healthy: bool, started: Instant, failure: &str) -> Self {
        Self {
            healthy,
            message: (!healthy).then(|| failure.to_string()),
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Full health check with subsystem status.
#[tracing::instrument(name = "health.check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshots.current();

    let start = Instant::now();
    let db_healthy = snapshot.db().health_check().await.is_ok();
    let database = ComponentStatus::from_check(db_healthy, start, "Database connection failed");

    let secrets = match &state.secrets {
        Some(secrets) => {
            let start = Instant::now();
            let healthy = secrets.health_check().await.is_ok();
            Some(ComponentStatus::from_check(
                healthy,
                start,
                "Secrets manager unavailable",
            ))
        }
        None => None,
    };

    let overall_healthy = database.healthy && secrets.as_ref().is_none_or(|s| s.healthy);

    let health = HealthStatus {
        status: if overall_healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        snapshot: snapshot.version().to_string(),
        subsystems: SubsystemStatus { database, secrets },
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health))
}

/// Kubernetes liveness probe.
///
/// Returns 200 if the service is running.
#[tracing::instrument(name = "health.liveness")]
pub async fn liveness() -> impl IntoResponse {
    StatusCode::OK
}

/// Kubernetes readiness probe.
///
/// Returns 200 once the current data snapshot answers queries.
#[tracing::instrument(name = "health.readiness", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.snapshots.current().db().health_check().await.is_err() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::OK
}

/// Prometheus metrics endpoint.
///
/// Returns metrics in Prometheus text format.
#[tracing::instrument(name = "health.metrics")]
pub async fn metrics() -> impl IntoResponse {
    #[cfg(feature = "prometheus")]
    {
        match get_prometheus_handle() {
            Some(handle) => (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            ),
            None => (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            ),
        }
    }
    #[cfg(not(feature = "prometheus"))]
    (
        StatusCode::NOT_FOUND,
        [("content-type", "text/plain")],
        "Prometheus metrics not enabled".to_string(),
    )
}
