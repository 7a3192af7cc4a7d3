//! Wire payloads returned by the verifier.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ApiProduct, App, Attribute, Company, Credential, Developer};

/// Error body shared by denials and request failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub response_code: String,
    pub response_message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            response_code: code.into(),
            response_message: message.into(),
        }
    }
}

/// Payload for an authorized key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyApiKeySuccessResponse {
    pub organization: String,
    pub environment: String,
    pub client_id: ClientIdDetails,
    #[serde(flatten)]
    pub principal: PrincipalDetails,
    pub app: AppDetails,
    pub api_product: ApiProductDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdDetails {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uris: Vec<String>,
    pub status: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub attributes: Vec<Attribute>,
}

impl ClientIdDetails {
    /// `secret` is the decrypted consumer secret.
    pub fn new(credential: &Credential, secret: String, attributes: Vec<Attribute>) -> Self {
        Self {
            client_id: credential.id.clone(),
            client_secret: secret,
            redirect_uris: credential.redirect_uris.clone(),
            status: credential.status.clone(),
            issued_at: credential.issued_at,
            expires_at: credential.expires_at,
            attributes,
        }
    }
}

/// The app owner, serialized under a `developer` or `company` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalDetails {
    Developer(DeveloperDetails),
    Company(CompanyDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperDetails {
    pub id: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub display_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by: String,
    pub attributes: Vec<Attribute>,
}

impl DeveloperDetails {
    pub fn new(developer: &Developer, attributes: Vec<Attribute>) -> Self {
        Self {
            id: developer.id.clone(),
            user_name: developer.username.clone(),
            first_name: developer.first_name.clone(),
            last_name: developer.last_name.clone(),
            email: developer.email.clone(),
            display_name: developer.display_name(),
            status: developer.status.clone(),
            created_at: developer.created_at,
            created_by: developer.created_by.clone(),
            last_modified_at: developer.updated_at,
            last_modified_by: developer.updated_by.clone(),
            attributes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by: String,
    pub attributes: Vec<Attribute>,
}

impl CompanyDetails {
    pub fn new(company: &Company, attributes: Vec<Attribute>) -> Self {
        Self {
            id: company.id.clone(),
            name: company.name.clone(),
            display_name: company.display_name.clone(),
            status: company.status.clone(),
            created_at: company.created_at,
            created_by: company.created_by.clone(),
            last_modified_at: company.updated_at,
            last_modified_by: company.updated_by.clone(),
            attributes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDetails {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub access_type: String,
    pub callback_url: String,
    pub status: String,
    pub app_family: String,
    /// `developer` or `company`
    pub ctype: &'static str,
    pub owner_id: String,
    /// Names of the products bound to the presented credential.
    pub api_products: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by: String,
    pub attributes: Vec<Attribute>,
}

impl AppDetails {
    pub fn new(app: &App, api_products: Vec<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            id: app.id.clone(),
            name: app.name.clone(),
            display_name: app.display_name.clone(),
            access_type: app.access_type.clone(),
            callback_url: app.callback_url.clone(),
            status: app.status.clone(),
            app_family: app.app_family.clone(),
            ctype: app.owner.ctype(),
            owner_id: app.owner.id().to_string(),
            api_products,
            created_at: app.created_at,
            created_by: app.created_by.clone(),
            last_modified_at: app.updated_at,
            last_modified_by: app.updated_by.clone(),
            attributes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProductDetails {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub approval_type: String,
    pub quota_limit: i64,
    pub quota_interval: i64,
    pub quota_time_unit: String,
    pub environments: Vec<String>,
    pub api_proxies: Vec<String>,
    pub api_resources: Vec<String>,
    pub scopes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by: String,
    pub attributes: Vec<Attribute>,
}

impl ApiProductDetails {
    pub fn new(product: &ApiProduct, attributes: Vec<Attribute>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            display_name: product.display_name.clone(),
            status: product.status.clone(),
            approval_type: product.approval_type.clone(),
            quota_limit: product.quota.limit_value(),
            quota_interval: product.quota.interval_value(),
            quota_time_unit: product.quota.time_unit.clone(),
            environments: product.environments.clone(),
            api_proxies: product.proxies.clone(),
            api_resources: product.resources.clone(),
            scopes: product.scopes.clone(),
            created_at: product.created_at,
            created_by: product.created_by.clone(),
            last_modified_at: product.updated_at,
            last_modified_by: product.updated_by.clone(),
            attributes,
        }
    }
}
