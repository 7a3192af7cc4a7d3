//! Shared setup for HTTP-level tests.

use std::{collections::HashMap, sync::Arc};

use axum::{Router, body::Body};
use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use crate::{
    AppState, build_app,
    cipher::{generate_key, key_secret_name},
    config::{DatabaseConfig, GatewayConfig},
    db::{
        DbPool,
        tests::{harness::create_seeded_pool, seed::ORG},
    },
    secrets::{MemorySecretManager, SecretManager},
};

/// Snapshot version the test state starts on.
pub const FIXTURE_VERSION: &str = "fixture-v1";

/// Application over a freshly seeded database.
pub async fn test_app(config: GatewayConfig) -> (Router, AppState) {
    test_app_with_pool(config, create_seeded_pool().await)
}

/// Application over `pool`, with an in-memory key for the fixture organization.
pub fn test_app_with_pool(mut config: GatewayConfig, pool: SqlitePool) -> (Router, AppState) {
    let DatabaseConfig::Sqlite(sqlite) = &mut config.database;
    sqlite.snapshot_version = FIXTURE_VERSION.to_string();

    let key_name = key_secret_name(&config.cipher.key_prefix, ORG);
    let secrets: Arc<dyn SecretManager> = Arc::new(MemorySecretManager::with_values(
        HashMap::from([(key_name, generate_key())]),
    ));

    let state = AppState::from_parts(config.clone(), DbPool::from_sqlite(pool), Some(secrets));
    (build_app(&config, state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

/// POST a raw body and return the status and raw response bytes.
pub async fn post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

/// POST JSON and parse the JSON response.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let (status, bytes) = post_raw(app, uri, body.to_string()).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// GET and parse the JSON response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
