use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{error::DbResult, repos::DataScopeRepo};

pub struct SqliteDataScopeRepo {
    pool: SqlitePool,
}

impl SqliteDataScopeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataScopeRepo for SqliteDataScopeRepo {
    async fn tenant_for_org(&self, org: &str) -> DbResult<Option<String>> {
        let tenant = sqlx::query_scalar::<_, String>(
            r#"
            SELECT tenant_id FROM data_scopes
            WHERE org = ?
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(org)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }
}
