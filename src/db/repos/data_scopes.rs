use async_trait::async_trait;

use crate::db::error::DbResult;

#[async_trait]
pub trait DataScopeRepo: Send + Sync {
    /// Resolve an organization name to its tenant.
    ///
    /// When an organization spans several tenants the earliest scope wins.
    async fn tenant_for_org(&self, org: &str) -> DbResult<Option<String>>;
}
