use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{STATUS_APPROVED, status_is};

/// An API key. The id is the consumer key presented by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub tenant_id: String,
    pub app_id: String,
    /// Stored form of the secret; may carry a `{ALG/MODE/PADDING}` prefix.
    pub consumer_secret: String,
    pub status: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub redirect_uris: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl Credential {
    pub fn is_approved(&self) -> bool {
        status_is(&self.status, STATUS_APPROVED)
    }
}
