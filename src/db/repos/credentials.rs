use async_trait::async_trait;

use crate::{db::error::DbResult, identifiers::ResolvedIdentifiers, models::Credential};

#[async_trait]
pub trait CredentialRepo: Send + Sync {
    /// Look up a credential by consumer key within any tenant of an organization.
    async fn get_by_key_in_org(&self, key: &str, org: &str) -> DbResult<Option<Credential>>;

    /// Credentials matching an identifier lookup.
    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<Credential>>;
}
