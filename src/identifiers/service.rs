//! Run resolved identifier lookups against a data snapshot.

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use thiserror::Error;

use super::{resolver::ResolvedIdentifiers, tree::EntityEndpoint};
use crate::{
    cipher::{Cipher, CipherError},
    db::{DbError, DbPool, DbSnapshot},
    models::{
        ApiProduct, App, Attribute, Company, CompanyDeveloper, Credential, Developer,
        WithAttributes, kind,
    },
};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Organization '{0}' not found")]
    OrganizationNotFound(String),

    #[error("Lookup failed: {0}")]
    Db(#[from] DbError),

    #[error("Secret decryption failed: {0}")]
    Decrypt(#[from] CipherError),
}

pub type LookupResult<T> = Result<T, LookupError>;

/// A product bound to a credential, as listed under `appCredentials`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProduct {
    pub api_product: String,
    pub status: String,
}

/// A credential with its secret decrypted and its product bindings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCredential {
    #[serde(flatten)]
    pub credential: Credential,
    pub api_products: Vec<CredentialProduct>,
}

/// Entities found by a lookup, keyed by endpoint on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityList {
    ApiProducts(Vec<WithAttributes<ApiProduct>>),
    Apps(Vec<WithAttributes<App>>),
    Companies(Vec<WithAttributes<Company>>),
    Developers(Vec<WithAttributes<Developer>>),
    AppCredentials(Vec<WithAttributes<AppCredential>>),
    CompanyDevelopers(Vec<CompanyDeveloper>),
}

impl EntityList {
    pub fn len(&self) -> usize {
        match self {
            Self::ApiProducts(v) => v.len(),
            Self::Apps(v) => v.len(),
            Self::Companies(v) => v.len(),
            Self::Developers(v) => v.len(),
            Self::AppCredentials(v) => v.len(),
            Self::CompanyDevelopers(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityLookupResponse {
    pub organization: String,
    pub primary_identifier_type: &'static str,
    pub primary_identifier_value: String,
    pub secondary_identifier_type: &'static str,
    pub secondary_identifier_value: String,
    #[serde(flatten)]
    pub entities: EntityList,
}

/// Looks up entities by resolved identifiers.
#[derive(Clone)]
pub struct EntityLookupService {
    cipher: Arc<dyn Cipher>,
}

impl EntityLookupService {
    pub fn new(cipher: Arc<dyn Cipher>) -> Self {
        Self { cipher }
    }

    #[tracing::instrument(
        name = "entities.lookup",
        skip_all,
        fields(
            org = %organization,
            endpoint = %lookup.endpoint,
            primary = %lookup.primary,
            snapshot = %snapshot.version(),
        )
    )]
    pub async fn lookup(
        &self,
        snapshot: &DbSnapshot,
        organization: &str,
        lookup: &ResolvedIdentifiers,
    ) -> LookupResult<EntityLookupResponse> {
        let db = snapshot.db();
        let tenant_id = db
            .data_scopes()
            .tenant_for_org(organization)
            .await?
            .ok_or_else(|| LookupError::OrganizationNotFound(organization.to_string()))?;
        let tenant_id = tenant_id.as_str();

        let entities = match lookup.endpoint {
            EntityEndpoint::ApiProducts => {
                let products = db.api_products().find(tenant_id, lookup).await?;
                EntityList::ApiProducts(
                    attach_attributes(db, tenant_id, products, kind::API_PRODUCT, |p| &p.id)
                        .await?,
                )
            }
            EntityEndpoint::Apps => {
                let apps = db.apps().find(tenant_id, lookup).await?;
                EntityList::Apps(attach_attributes(db, tenant_id, apps, kind::APP, |a| &a.id).await?)
            }
            EntityEndpoint::Companies => {
                let companies = db.companies().find(tenant_id, lookup).await?;
                EntityList::Companies(
                    attach_attributes(db, tenant_id, companies, kind::COMPANY, |c| &c.id).await?,
                )
            }
            EntityEndpoint::Developers => {
                let developers = db.developers().find(tenant_id, lookup).await?;
                EntityList::Developers(
                    attach_attributes(db, tenant_id, developers, kind::DEVELOPER, |d| &d.id)
                        .await?,
                )
            }
            EntityEndpoint::AppCredentials => {
                let credentials = db.credentials().find(tenant_id, lookup).await?;
                let credentials = self
                    .app_credentials(db, tenant_id, organization, credentials)
                    .await?;
                EntityList::AppCredentials(
                    attach_attributes(db, tenant_id, credentials, kind::CREDENTIAL, |c| {
                        &c.credential.id
                    })
                    .await?,
                )
            }
            EntityEndpoint::CompanyDevelopers => {
                EntityList::CompanyDevelopers(db.company_developers().find(tenant_id, lookup).await?)
            }
        };

        tracing::debug!(count = entities.len(), "Entity lookup complete");
        Ok(EntityLookupResponse {
            organization: organization.to_string(),
            primary_identifier_type: lookup.primary.wire_name(),
            primary_identifier_value: lookup.primary_value.clone(),
            secondary_identifier_type: lookup.secondary_type(),
            secondary_identifier_value: lookup.secondary_value().to_string(),
            entities,
        })
    }

    /// Decrypt secrets and collect product bindings for each credential.
    async fn app_credentials(
        &self,
        db: &DbPool,
        tenant_id: &str,
        organization: &str,
        credentials: Vec<Credential>,
    ) -> LookupResult<Vec<AppCredential>> {
        let mut result = Vec::with_capacity(credentials.len());
        for mut credential in credentials {
            let bindings = db
                .api_products()
                .list_bindings(tenant_id, &credential.id)
                .await?;
            credential.consumer_secret = self
                .cipher
                .decrypt(organization, &credential.consumer_secret)
                .await?;
            result.push(AppCredential {
                credential,
                api_products: bindings
                    .into_iter()
                    .map(|b| CredentialProduct {
                        api_product: b.product.name,
                        status: b.status,
                    })
                    .collect(),
            });
        }
        Ok(result)
    }
}

/// Fetch attributes for all entities in one query and pair them up.
async fn attach_attributes<T, F>(
    db: &DbPool,
    tenant_id: &str,
    entities: Vec<T>,
    entity_kind: &str,
    id_of: F,
) -> LookupResult<Vec<WithAttributes<T>>>
where
    F: Fn(&T) -> &String,
{
    if entities.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<&str> = entities.iter().map(|e| id_of(e).as_str()).collect();
    let attributes: HashMap<String, Vec<Attribute>> =
        db.attributes().list_for_entities(tenant_id, &ids).await?;

    Ok(entities
        .into_iter()
        .map(|entity| {
            let attrs = attributes
                .get(id_of(&entity))
                .map(|attrs| {
                    attrs
                        .iter()
                        .filter(|a| a.kind == entity_kind)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            WithAttributes::new(entity, attrs)
        })
        .collect())
}
