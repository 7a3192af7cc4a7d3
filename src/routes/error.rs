use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    identifiers::{IdentifierError, LookupError},
    verify::{ErrorResponse, VerifyError},
};

/// HTTP-facing error. Store and decryption details are logged, never returned.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: &'static str, message: String },
    NotFound { code: &'static str, message: String },
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "BadRequest",
            message: message.into(),
        }
    }

    /// Label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Internal(_) => "error",
        }
    }
}

impl From<VerifyError> for ApiError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Validation(message) => ApiError::bad_request(message),
            VerifyError::Lookup(e) => {
                tracing::error!(error = %e, "Key lookup failed");
                ApiError::Internal(e.to_string())
            }
            VerifyError::Decrypt(e) => {
                tracing::error!(error = %e, "Secret decryption failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<IdentifierError> for ApiError {
    fn from(err: IdentifierError) -> Self {
        let code = match err {
            IdentifierError::UnknownEndpoint(_) => "UnknownEndpoint",
            _ => "InvalidIdentifiers",
        };
        ApiError::BadRequest {
            code,
            message: err.to_string(),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::OrganizationNotFound(_) => ApiError::NotFound {
                code: "OrganizationNotFound",
                message: err.to_string(),
            },
            LookupError::Db(e) => {
                tracing::error!(error = %e, "Entity lookup failed");
                ApiError::Internal(e.to_string())
            }
            LookupError::Decrypt(e) => {
                tracing::error!(error = %e, "Secret decryption failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(code, message))
            }
            ApiError::NotFound { code, message } => {
                (StatusCode::NOT_FOUND, ErrorResponse::new(code, message))
            }
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("InternalServerError", "Internal server error"),
            ),
        };
        (status, Json(body)).into_response()
    }
}
