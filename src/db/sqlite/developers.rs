use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::common::{APP_CREDENTIALS, unsupported};
use crate::{
    db::{
        error::DbResult,
        query::{EntityQuery, Join},
        repos::DeveloperRepo,
    },
    identifiers::{Identifier, ResolvedIdentifiers},
    models::{Developer, canonical_status},
};

/// Apps owned by the developer aliased `d`.
const DEVELOPER_APPS: Join = Join::new(
    "a",
    "JOIN apps a ON a.tenant_id = d.tenant_id AND a.developer_id = d.id",
);

pub struct SqliteDeveloperRepo {
    pool: SqlitePool,
}

impl SqliteDeveloperRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(super) fn parse_developer(row: &SqliteRow) -> DbResult<Developer> {
        Ok(Developer {
            id: row.get("id"),
            tenant_id: row.get("tenant_id"),
            username: row.get("username"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            status: canonical_status(row.get("status")),
            created_at: row.get("created_at"),
            created_by: row.get("created_by"),
            updated_at: row.get("updated_at"),
            updated_by: row.get("updated_by"),
        })
    }
}

#[async_trait]
impl DeveloperRepo for SqliteDeveloperRepo {
    async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Developer>> {
        let row = sqlx::query("SELECT * FROM developers WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_developer).transpose()
    }

    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<Developer>> {
        let query = EntityQuery::select("SELECT d.* FROM developers d")
            .filter_eq("d.tenant_id", tenant_id);
        let value = lookup.primary_value.as_str();

        let query = match lookup.primary {
            Identifier::AppId => query.join(DEVELOPER_APPS).filter_eq("a.id", value),
            Identifier::ConsumerKey => query
                .join(DEVELOPER_APPS)
                .join(APP_CREDENTIALS)
                .filter_eq("c.id", value),
            Identifier::DeveloperEmail => query.filter_eq("d.email", value),
            Identifier::DeveloperId => query.filter_eq("d.id", value),
            other => return Err(unsupported(lookup, other)),
        };
        if let Some(secondary) = lookup.secondary_identifier() {
            return Err(unsupported(lookup, secondary));
        }

        query
            .order_by("d.email")
            .order_by("d.id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(Self::parse_developer)
            .collect()
    }
}
