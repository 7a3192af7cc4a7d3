use async_trait::async_trait;

use crate::{db::error::DbResult, identifiers::ResolvedIdentifiers, models::Developer};

#[async_trait]
pub trait DeveloperRepo: Send + Sync {
    async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Developer>>;

    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<Developer>>;
}
