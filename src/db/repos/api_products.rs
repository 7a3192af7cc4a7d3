use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    identifiers::ResolvedIdentifiers,
    models::{ApiProduct, ProductBinding},
};

#[async_trait]
pub trait ApiProductRepo: Send + Sync {
    /// All products bound to a credential, in binding order, whatever the
    /// binding status.
    async fn list_bindings(
        &self,
        tenant_id: &str,
        credential_id: &str,
    ) -> DbResult<Vec<ProductBinding>>;

    /// Products matching an identifier lookup. Each product appears once,
    /// in the order it was first reached.
    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<ApiProduct>>;
}
