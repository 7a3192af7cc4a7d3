use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::common::{APP_CREDENTIALS, unsupported};
use crate::{
    db::{
        error::DbResult,
        query::{EntityQuery, Join},
        repos::CompanyRepo,
    },
    identifiers::{Identifier, ResolvedIdentifiers},
    models::{Company, canonical_status},
};

/// Apps owned by the company aliased `co`.
const COMPANY_APPS: Join = Join::new(
    "a",
    "JOIN apps a ON a.tenant_id = co.tenant_id AND a.company_id = co.id",
);

pub struct SqliteCompanyRepo {
    pool: SqlitePool,
}

impl SqliteCompanyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(super) fn parse_company(row: &SqliteRow) -> DbResult<Company> {
        Ok(Company {
            id: row.get("id"),
            tenant_id: row.get("tenant_id"),
            name: row.get("name"),
            display_name: row.get("display_name"),
            status: canonical_status(row.get("status")),
            created_at: row.get("created_at"),
            created_by: row.get("created_by"),
            updated_at: row.get("updated_at"),
            updated_by: row.get("updated_by"),
        })
    }
}

#[async_trait]
impl CompanyRepo for SqliteCompanyRepo {
    async fn get_by_id(&self, tenant_id: &str, id: &str) -> DbResult<Option<Company>> {
        let row = sqlx::query("SELECT * FROM companies WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::parse_company).transpose()
    }

    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<Company>> {
        let query = EntityQuery::select("SELECT co.* FROM companies co")
            .filter_eq("co.tenant_id", tenant_id);
        let value = lookup.primary_value.as_str();

        let query = match lookup.primary {
            Identifier::AppId => query.join(COMPANY_APPS).filter_eq("a.id", value),
            Identifier::CompanyName => query.filter_eq("co.name", value),
            Identifier::ConsumerKey => query
                .join(COMPANY_APPS)
                .join(APP_CREDENTIALS)
                .filter_eq("c.id", value),
            other => return Err(unsupported(lookup, other)),
        };
        if let Some(secondary) = lookup.secondary_identifier() {
            return Err(unsupported(lookup, secondary));
        }

        query
            .order_by("co.name")
            .order_by("co.id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(Self::parse_company)
            .collect()
    }
}
