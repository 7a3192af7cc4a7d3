use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::{
    db::{error::DbResult, query::EntityQuery, repos::AttributeRepo},
    models::Attribute,
};

pub struct SqliteAttributeRepo {
    pool: SqlitePool,
}

impl SqliteAttributeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttributeRepo for SqliteAttributeRepo {
    async fn list_for_entities(
        &self,
        tenant_id: &str,
        entity_ids: &[&str],
    ) -> DbResult<HashMap<String, Vec<Attribute>>> {
        if entity_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = EntityQuery::select(
            "SELECT entity_id, kind, name, value FROM attributes",
        )
        .filter_eq("tenant_id", tenant_id)
        .filter_in("entity_id", entity_ids.iter().copied())
        .order_by("seq")
        .fetch_all(&self.pool)
        .await?;

        let mut attributes: HashMap<String, Vec<Attribute>> = HashMap::new();
        for row in rows {
            attributes
                .entry(row.get("entity_id"))
                .or_default()
                .push(Attribute {
                    name: row.get("name"),
                    value: row.get("value"),
                    kind: row.get("kind"),
                });
        }

        Ok(attributes)
    }
}
