use async_trait::async_trait;

use crate::{db::error::DbResult, identifiers::ResolvedIdentifiers, models::CompanyDeveloper};

#[async_trait]
pub trait CompanyDeveloperRepo: Send + Sync {
    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<CompanyDeveloper>>;
}
