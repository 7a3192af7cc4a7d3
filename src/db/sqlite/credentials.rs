use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::common::{parse_string_list, unsupported};
use crate::{
    db::{error::DbResult, query::EntityQuery, repos::CredentialRepo},
    identifiers::{Identifier, ResolvedIdentifiers},
    models::{Credential, canonical_status},
};

pub struct SqliteCredentialRepo {
    pool: SqlitePool,
}

impl SqliteCredentialRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(super) fn parse_credential(row: &SqliteRow) -> DbResult<Credential> {
        Ok(Credential {
            id: row.get("id"),
            tenant_id: row.get("tenant_id"),
            app_id: row.get("app_id"),
            consumer_secret: row.get("consumer_secret"),
            status: canonical_status(row.get("status")),
            issued_at: row.get("issued_at"),
            expires_at: row.get("expires_at"),
            redirect_uris: parse_string_list(row.get("redirect_uris"))?,
            created_at: row.get("created_at"),
            created_by: row.get("created_by"),
            updated_at: row.get("updated_at"),
            updated_by: row.get("updated_by"),
        })
    }
}

#[async_trait]
impl CredentialRepo for SqliteCredentialRepo {
    async fn get_by_key_in_org(&self, key: &str, org: &str) -> DbResult<Option<Credential>> {
        let row = sqlx::query(
            r#"
            SELECT c.* FROM credentials c
            WHERE c.id = ?
              AND c.tenant_id IN (SELECT tenant_id FROM data_scopes WHERE org = ?)
            ORDER BY c.tenant_id
            LIMIT 1
            "#,
        )
        .bind(key)
        .bind(org)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::parse_credential).transpose()
    }

    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<Credential>> {
        let query = EntityQuery::select("SELECT c.* FROM credentials c")
            .filter_eq("c.tenant_id", tenant_id);

        let query = match lookup.primary {
            Identifier::ConsumerKey => query.filter_eq("c.id", lookup.primary_value.as_str()),
            other => return Err(unsupported(lookup, other)),
        };
        if let Some(secondary) = lookup.secondary_identifier() {
            return Err(unsupported(lookup, secondary));
        }

        query
            .order_by("c.created_at")
            .order_by("c.id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(Self::parse_credential)
            .collect()
    }
}
