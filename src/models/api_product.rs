use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{STATUS_APPROVED, status_is};

/// Quota settings carried through to callers. Values are opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    pub limit: String,
    pub interval: String,
    pub time_unit: String,
}

impl Quota {
    pub fn limit_value(&self) -> i64 {
        coerce_quota_number("limit", &self.limit)
    }

    pub fn interval_value(&self) -> i64 {
        coerce_quota_number("interval", &self.interval)
    }
}

/// Empty or non-numeric quota values coerce to zero.
fn coerce_quota_number(field: &str, raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            tracing::debug!(field, value = raw, "Non-numeric quota value, using 0");
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub status: String,
    pub approval_type: String,
    pub scopes: Vec<String>,
    pub quota: Quota,
    /// Empty means any environment.
    pub environments: Vec<String>,
    /// Empty means any proxy.
    pub proxies: Vec<String>,
    /// Glob patterns; empty means any path.
    pub resources: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// A credential's binding to a product, with the binding's own approval status.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductBinding {
    pub product: ApiProduct,
    pub status: String,
}

impl ProductBinding {
    pub fn is_approved(&self) -> bool {
        status_is(&self.status, STATUS_APPROVED)
    }
}
