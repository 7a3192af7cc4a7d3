use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{STATUS_ACTIVE, status_is};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: String,
    pub tenant_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl Developer {
    pub fn display_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub tenant_id: String,
    /// Canonical company name
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Owner of an app.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    Developer(Developer),
    Company(Company),
}

impl Principal {
    pub fn ctype(&self) -> &'static str {
        match self {
            Self::Developer(_) => "developer",
            Self::Company(_) => "company",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Developer(d) => &d.id,
            Self::Company(c) => &c.id,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            Self::Developer(d) => &d.status,
            Self::Company(c) => &c.status,
        }
    }

    pub fn is_active(&self) -> bool {
        status_is(self.status(), STATUS_ACTIVE)
    }
}

/// Membership of a developer in a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDeveloper {
    pub tenant_id: String,
    pub company_id: String,
    pub company_name: String,
    pub developer_id: String,
    pub developer_email: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}
