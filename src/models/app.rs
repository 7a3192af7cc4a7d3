use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{STATUS_APPROVED, status_is};

/// The principal that owns an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ownerType", content = "ownerId", rename_all = "lowercase")]
pub enum AppOwner {
    Developer(String),
    Company(String),
}

impl AppOwner {
    /// Build an owner from the nullable `developer_id`/`company_id` column pair.
    ///
    /// Exactly one of the two must be set.
    pub fn from_columns(
        developer_id: Option<String>,
        company_id: Option<String>,
    ) -> Result<Self, String> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        match (non_empty(developer_id), non_empty(company_id)) {
            (Some(id), None) => Ok(Self::Developer(id)),
            (None, Some(id)) => Ok(Self::Company(id)),
            (Some(_), Some(_)) => Err("app is owned by both a developer and a company".into()),
            (None, None) => Err("app has no owner".into()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Developer(id) | Self::Company(id) => id,
        }
    }

    /// The `ctype` tag of the owning principal.
    pub fn ctype(&self) -> &'static str {
        match self {
            Self::Developer(_) => "developer",
            Self::Company(_) => "company",
        }
    }

    pub fn developer_id(&self) -> Option<&str> {
        match self {
            Self::Developer(id) => Some(id),
            Self::Company(_) => None,
        }
    }

    pub fn company_id(&self) -> Option<&str> {
        match self {
            Self::Company(id) => Some(id),
            Self::Developer(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub display_name: String,
    pub access_type: String,
    pub callback_url: String,
    pub status: String,
    pub app_family: String,
    #[serde(flatten)]
    pub owner: AppOwner,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl App {
    pub fn is_approved(&self) -> bool {
        status_is(&self.status, STATUS_APPROVED)
    }
}
