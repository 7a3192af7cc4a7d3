//! Outcome of a verification.

use std::fmt;

use serde::Serialize;

use super::response::{ErrorResponse, VerifyApiKeySuccessResponse};

/// Machine-readable reason for a denial. The codes are part of the wire
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialCode {
    InvalidApiKey,
    DeveloperStatusNotActive,
    CompanyStatusNotActive,
    AppNotApproved,
    ApiKeyNotApproved,
    InvalidApiKeyForGivenResource,
}

impl DenialCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidApiKey => "InvalidApiKey",
            Self::DeveloperStatusNotActive => "DeveloperStatusNotActive",
            Self::CompanyStatusNotActive => "CompanyStatusNotActive",
            Self::AppNotApproved => "invalid_client-app_not_approved",
            Self::ApiKeyNotApproved => "ApiKeyNotApproved",
            Self::InvalidApiKeyForGivenResource => "InvalidApiKeyForGivenResource",
        }
    }
}

impl fmt::Display for DenialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DenialCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub code: DenialCode,
    pub message: String,
}

impl Denial {
    fn new(code: DenialCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_api_key(key: &str, organization: &str) -> Self {
        Self::new(
            DenialCode::InvalidApiKey,
            format!("API Key verify failed for ({key}, {organization})"),
        )
    }

    pub fn developer_not_active() -> Self {
        Self::new(DenialCode::DeveloperStatusNotActive, "Developer not active")
    }

    pub fn company_not_active() -> Self {
        Self::new(DenialCode::CompanyStatusNotActive, "Company not active")
    }

    pub fn app_not_approved() -> Self {
        Self::new(DenialCode::AppNotApproved, "App not approved")
    }

    pub fn key_not_approved() -> Self {
        Self::new(DenialCode::ApiKeyNotApproved, "Approved key not found")
    }

    pub fn product_not_resolved() -> Self {
        Self::new(
            DenialCode::InvalidApiKeyForGivenResource,
            "Path Validation Failed. Product not resolved",
        )
    }

    pub fn path_mismatch(resources: &[String], path: &str) -> Self {
        Self::new(
            DenialCode::InvalidApiKeyForGivenResource,
            format!("Path Validation Failed ({} vs {path})", resources.join(", ")),
        )
    }

    pub fn environment_mismatch(environments: &[String], environment: &str) -> Self {
        Self::new(
            DenialCode::InvalidApiKeyForGivenResource,
            format!(
                "ENV Validation Failed ({} vs {environment})",
                environments.join(", ")
            ),
        )
    }

    pub fn proxy_mismatch(proxies: &[String], proxy: &str) -> Self {
        Self::new(
            DenialCode::InvalidApiKeyForGivenResource,
            format!("Proxy Validation Failed ({} vs {proxy})", proxies.join(", ")),
        )
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code.as_str(), self.message.clone())
    }
}

/// Result of the validation state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Authorized(Box<VerifyApiKeySuccessResponse>),
    Denied(Denial),
}

impl Decision {
    /// Metric label for the outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Authorized(_) => "authorized",
            Self::Denied(_) => "denied",
        }
    }

    /// Denial code, or `"ok"` when authorized.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authorized(_) => "ok",
            Self::Denied(denial) => denial.code.as_str(),
        }
    }
}
