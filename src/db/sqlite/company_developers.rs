use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::common::{parse_string_list, unsupported};
use crate::{
    db::{
        error::DbResult,
        query::{EntityQuery, Join},
        repos::CompanyDeveloperRepo,
    },
    identifiers::{Identifier, ResolvedIdentifiers},
    models::CompanyDeveloper,
};

const MEMBERSHIP_COMPANY: Join = Join::new(
    "co",
    "JOIN companies co ON co.tenant_id = cd.tenant_id AND co.id = cd.company_id",
);

const MEMBERSHIP_DEVELOPER: Join = Join::new(
    "d",
    "LEFT JOIN developers d ON d.tenant_id = cd.tenant_id AND d.id = cd.developer_id",
);

pub struct SqliteCompanyDeveloperRepo {
    pool: SqlitePool,
}

impl SqliteCompanyDeveloperRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_membership(row: &SqliteRow) -> DbResult<CompanyDeveloper> {
        Ok(CompanyDeveloper {
            tenant_id: row.get("tenant_id"),
            company_id: row.get("company_id"),
            company_name: row.get("company_name"),
            developer_id: row.get("developer_id"),
            developer_email: row.get("developer_email"),
            roles: parse_string_list(row.get("roles"))?,
            created_at: row.get("created_at"),
            created_by: row.get("created_by"),
            updated_at: row.get("updated_at"),
            updated_by: row.get("updated_by"),
        })
    }
}

#[async_trait]
impl CompanyDeveloperRepo for SqliteCompanyDeveloperRepo {
    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<CompanyDeveloper>> {
        let query = EntityQuery::select(
            "SELECT cd.*, co.name AS company_name, COALESCE(d.email, '') AS developer_email \
             FROM company_developers cd",
        )
        .join(MEMBERSHIP_COMPANY)
        .join(MEMBERSHIP_DEVELOPER)
        .filter_eq("cd.tenant_id", tenant_id);

        let query = match lookup.primary {
            Identifier::CompanyName => query.filter_eq("co.name", lookup.primary_value.as_str()),
            other => return Err(unsupported(lookup, other)),
        };
        if let Some(secondary) = lookup.secondary_identifier() {
            return Err(unsupported(lookup, secondary));
        }

        query
            .order_by("developer_email")
            .order_by("cd.developer_id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(Self::parse_membership)
            .collect()
    }
}
