//! `POST /verifiers/apikey`

use std::time::Instant;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use crate::{
    AppState,
    observability::metrics,
    verify::{Decision, VerifyApiKeyRequest, VerifyError},
};

/// Verify an API key against the current data snapshot.
///
/// Authorized and denied requests both answer 200; a denial carries
/// `{responseCode, responseMessage}`. Malformed or incomplete requests answer
/// 400 with the same body shape.
pub async fn verify_api_key(State(state): State<AppState>, body: Bytes) -> Response {
    let start = Instant::now();
    let result = run_verify(&state, &body).await;
    let elapsed = start.elapsed().as_secs_f64();

    match result {
        Ok(decision) => {
            metrics::record_verification(decision.outcome(), decision.code(), elapsed);
            match decision {
                Decision::Authorized(payload) => Json(payload).into_response(),
                Decision::Denied(denial) => Json(denial.to_response()).into_response(),
            }
        }
        Err(err) => {
            let err = ApiError::from(err);
            metrics::record_verification("error", err.kind(), elapsed);
            err.into_response()
        }
    }
}

async fn run_verify(state: &AppState, body: &[u8]) -> Result<Decision, VerifyError> {
    let request: VerifyApiKeyRequest = serde_json::from_slice(body)
        .map_err(|e| VerifyError::Validation(format!("Invalid request body: {e}")))?;
    let request = request.validate(state.config.verify.default_validate_proxies_and_envs)?;

    let snapshot = state.snapshots.current();
    state.verifier.verify(&snapshot, &request).await
}
