use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::common::{APP_CREDENTIALS, filter_app_owner, unsupported};
use crate::{
    db::{
        error::{DbError, DbResult},
        query::EntityQuery,
        repos::AppRepo,
    },
    identifiers::{Identifier, ResolvedIdentifiers},
    models::{App, AppOwner, canonical_status},
};

pub struct SqliteAppRepo {
    pool: SqlitePool,
}

impl SqliteAppRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(super) fn parse_app(row: &SqliteRow) -> DbResult<App> {
        let id: String = row.get("id");
        let owner = AppOwner::from_columns(row.get("developer_id"), row.get("company_id"))
            .map_err(|e| DbError::Internal(format!("App {id}: {e}")))?;

        Ok(App {
            id,
            tenant_id: row.get("tenant_id"),
            name: row.get("name"),
            display_name: row.get("display_name"),
            access_type: row.get("access_type"),
            callback_url: row.get("callback_url"),
            status: canonical_status(row.get("status")),
            app_family: row.get("app_family"),
            owner,
            created_at: row.get("created_at"),
            created_by: row.get("created_by"),
            updated_at: row.get("updated_at"),
            updated_by: row.get("updated_by"),
        })
    }
}

#[async_trait]
impl AppRepo for SqliteAppRepo {
    async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<App>> {
        let row = sqlx::query("SELECT * FROM apps WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_app).transpose()
    }

    async fn find(&self, tenant_id: &str, lookup: &ResolvedIdentifiers) -> DbResult<Vec<App>> {
        let query =
            EntityQuery::select("SELECT a.* FROM apps a").filter_eq("a.tenant_id", tenant_id);
        let value = lookup.primary_value.as_str();

        let query = match lookup.primary {
            Identifier::AppId => query.filter_eq("a.id", value),
            Identifier::AppName => query.filter_eq("a.name", value),
            Identifier::ConsumerKey => query.join(APP_CREDENTIALS).filter_eq("c.id", value),
            other => return Err(unsupported(lookup, other)),
        };
        let query = filter_app_owner(query, lookup)?;

        query
            .order_by("a.name")
            .order_by("a.id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(Self::parse_app)
            .collect()
    }
}
