use async_trait::async_trait;

use crate::{db::error::DbResult, identifiers::ResolvedIdentifiers, models::Company};

#[async_trait]
pub trait CompanyRepo: Send + Sync {
    async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Company>>;

    async fn find(&self, tenant_id: &str, lookup: &ResolvedIdentifiers)
    -> DbResult<Vec<Company>>;
}
