use async_trait::async_trait;

use crate::{db::error::DbResult, identifiers::ResolvedIdentifiers, models::App};

#[async_trait]
pub trait AppRepo: Send + Sync {
    async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<App>>;

    /// Apps matching an identifier lookup. Secondary developer or company
    /// identifiers narrow the result by the app's owner.
    async fn find(&self, tenant_id: &str, lookup: &ResolvedIdentifiers) -> DbResult<Vec<App>>;
}
