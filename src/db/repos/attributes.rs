use std::collections::HashMap;

use async_trait::async_trait;

use crate::{db::error::DbResult, models::Attribute};

#[async_trait]
pub trait AttributeRepo: Send + Sync {
    /// Attributes for a set of entities in one tenant, keyed by entity id.
    ///
    /// Each entity's attributes keep their insertion order. Entities without
    /// attributes are absent from the map.
    async fn list_for_entities(
        &self,
        tenant_id: &str,
        entity_ids: &[&str],
    ) -> DbResult<HashMap<String, Vec<Attribute>>>;
}
