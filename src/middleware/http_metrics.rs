//! Per-request HTTP metrics.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;

/// Record method, route and status of every request.
///
/// The route template (`/entities/{endpoint}`) is used as the path label so
/// that label cardinality stays bounded.
pub async fn http_metrics_middleware(req: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let duration = start_time.elapsed();
    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        duration.as_secs_f64(),
    );
    response
}
