//! API key verification and entity lookup for API gateway control planes.
//!
//! The service answers two questions against a versioned snapshot of
//! developer, company, app, credential and API product data:
//!
//! - `POST /verifiers/apikey`: may this key call this path, in this
//!   environment, through this proxy?
//! - `GET /entities/{endpoint}`: which entities match these identifiers?

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};
use thiserror::Error;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub mod cipher;
pub mod config;
pub mod db;
pub mod identifiers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod secrets;
pub mod verify;

#[cfg(test)]
mod tests;

use crate::{
    cipher::{AesGcmCipher, Cipher},
    config::GatewayConfig,
    db::{DbError, DbPool, DbSnapshot, SnapshotHandle},
    identifiers::EntityLookupService,
    secrets::SecretManager,
    verify::Verifier,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    /// Current data snapshot. Handlers read it once per request.
    pub snapshots: SnapshotHandle,
    pub secrets: Option<Arc<dyn SecretManager>>,
    pub cipher: Arc<dyn Cipher>,
    pub verifier: Verifier,
    pub lookups: EntityLookupService,
}

impl AppState {
    /// Connect to the configured database and assemble the services.
    pub async fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let db = DbPool::from_config(&config.database).await?;
        if config.database.run_migrations() {
            db.run_migrations().await?;
        }

        let secrets = secrets::from_config(&config.secrets);
        if secrets.is_none() {
            tracing::warn!("No secrets backend configured; encrypted secrets cannot be decrypted");
        }

        Ok(Self::from_parts(config, db, secrets))
    }

    /// Assemble state around an existing pool.
    pub fn from_parts(
        config: GatewayConfig,
        db: DbPool,
        secrets: Option<Arc<dyn SecretManager>>,
    ) -> Self {
        let version = config.database.snapshot_version().to_string();
        let cipher: Arc<dyn Cipher> = Arc::new(AesGcmCipher::new(
            secrets.clone(),
            config.cipher.key_prefix.clone(),
        ));

        tracing::info!(snapshot = %version, "Serving data snapshot");

        Self {
            config: Arc::new(config),
            snapshots: SnapshotHandle::new(DbSnapshot::new(version, db)),
            secrets,
            verifier: Verifier::new(cipher.clone()),
            lookups: EntityLookupService::new(cipher.clone()),
            cipher,
        }
    }

    /// Switch new requests to another data version.
    ///
    /// Requests already in flight finish against the snapshot they started
    /// with. The replaced snapshot is returned so callers can close it once
    /// they are done with it.
    pub fn install_snapshot(&self, version: impl Into<String>, db: DbPool) -> Arc<DbSnapshot> {
        self.snapshots.install(DbSnapshot::new(version, db))
    }
}

/// Build the HTTP application.
pub fn build_app(config: &GatewayConfig, state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/health/live", get(routes::health::liveness))
        .route("/health/ready", get(routes::health::readiness));

    if config.observability.metrics.enabled {
        app = app.route(
            &config.observability.metrics.path,
            get(routes::health::metrics),
        );
    }

    app.merge(routes::get_api_routes())
        .route_layer(axum::middleware::from_fn(
            middleware::http_metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.server.timeout(),
        ))
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
        .with_state(state)
}
