//! Verify request body and its validation.

use serde::Deserialize;

use super::error::VerifyError;

/// The only action the verifier accepts.
pub const VERIFY_ACTION: &str = "verify";

/// Verify request as received on the wire. Every field is optional here so
/// that all missing fields can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyApiKeyRequest {
    pub action: Option<String>,
    pub key: Option<String>,
    pub organization_name: Option<String>,
    pub uri_path: Option<String>,
    pub environment_name: Option<String>,
    pub api_proxy_name: Option<String>,
    pub validate_against_api_proxies_and_envs: Option<bool>,
}

/// A validated verify request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyApiKey {
    pub key: String,
    pub organization: String,
    pub path: String,
    pub environment: String,
    pub proxy: String,
    /// Whether the resolved product must admit the environment, proxy and path.
    pub enforce_context: bool,
}

impl VerifyApiKeyRequest {
    /// Check required fields and build a [`VerifyApiKey`].
    ///
    /// `environmentName` and `apiProxyName` are only required when
    /// enforcement is on. Missing fields are listed in declaration order.
    pub fn validate(self, default_enforce: bool) -> Result<VerifyApiKey, VerifyError> {
        let enforce_context = self
            .validate_against_api_proxies_and_envs
            .unwrap_or(default_enforce);

        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let mut missing = Vec::new();
        for (name, value, required) in [
            ("action", &self.action, true),
            ("key", &self.key, true),
            ("organizationName", &self.organization_name, true),
            ("uriPath", &self.uri_path, true),
            ("environmentName", &self.environment_name, enforce_context),
            ("apiProxyName", &self.api_proxy_name, enforce_context),
        ] {
            if required && !present(value) {
                missing.push(name);
            }
        }
        if !missing.is_empty() {
            return Err(VerifyError::Validation(format!(
                "Missing mandatory fields in the request : {}",
                missing.join(" ")
            )));
        }

        let action = self.action.unwrap_or_default();
        if action != VERIFY_ACTION {
            return Err(VerifyError::Validation(format!(
                "Unsupported action '{action}'"
            )));
        }

        Ok(VerifyApiKey {
            key: self.key.unwrap_or_default(),
            organization: self.organization_name.unwrap_or_default(),
            path: self.uri_path.unwrap_or_default(),
            environment: self.environment_name.unwrap_or_default(),
            proxy: self.api_proxy_name.unwrap_or_default(),
            enforce_context,
        })
    }
}
