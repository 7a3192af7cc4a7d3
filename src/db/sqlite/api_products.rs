use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::common::{filter_app_owner, parse_string_list, unsupported};
use crate::{
    db::{
        error::DbResult,
        query::{EntityQuery, Join},
        repos::ApiProductRepo,
    },
    identifiers::{Identifier, ResolvedIdentifiers},
    models::{ApiProduct, ProductBinding, Quota, canonical_status},
};

/// Credential bindings of the product aliased `p`.
const PRODUCT_BINDINGS: Join = Join::new(
    "cb",
    "JOIN credential_products cb ON cb.tenant_id = p.tenant_id AND cb.product_id = p.id",
);

/// Credential behind the binding aliased `cb`.
const BINDING_CREDENTIAL: Join = Join::new(
    "c",
    "JOIN credentials c ON c.tenant_id = cb.tenant_id AND c.id = cb.credential_id",
);

/// App of the credential aliased `c`.
const CREDENTIAL_APP: Join = Join::new(
    "a",
    "JOIN apps a ON a.tenant_id = c.tenant_id AND a.id = c.app_id",
);

pub struct SqliteApiProductRepo {
    pool: SqlitePool,
}

impl SqliteApiProductRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(super) fn parse_api_product(row: &SqliteRow) -> DbResult<ApiProduct> {
        Ok(ApiProduct {
            id: row.get("id"),
            tenant_id: row.get("tenant_id"),
            name: row.get("name"),
            display_name: row.get("display_name"),
            description: row.get("description"),
            status: canonical_status(row.get("status")),
            approval_type: row.get("approval_type"),
            scopes: parse_string_list(row.get("scopes"))?,
            quota: Quota {
                limit: row.get("quota_limit"),
                interval: row.get("quota_interval"),
                time_unit: row.get("quota_time_unit"),
            },
            environments: parse_string_list(row.get("environments"))?,
            proxies: parse_string_list(row.get("proxies"))?,
            resources: parse_string_list(row.get("resources"))?,
            created_at: row.get("created_at"),
            created_by: row.get("created_by"),
            updated_at: row.get("updated_at"),
            updated_by: row.get("updated_by"),
        })
    }
}

#[async_trait]
impl ApiProductRepo for SqliteApiProductRepo {
    async fn list_bindings(
        &self,
        tenant_id: &str,
        credential_id: &str,
    ) -> DbResult<Vec<ProductBinding>> {
        let rows = sqlx::query(
            r#"
            SELECT p.*, cb.status AS binding_status
            FROM credential_products cb
            JOIN api_products p ON p.tenant_id = cb.tenant_id AND p.id = cb.product_id
            WHERE cb.tenant_id = ? AND cb.credential_id = ?
            ORDER BY cb.seq
            "#,
        )
        .bind(tenant_id)
        .bind(credential_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ProductBinding {
                    product: Self::parse_api_product(row)?,
                    status: canonical_status(row.get("binding_status")),
                })
            })
            .collect()
    }

    async fn find(
        &self,
        tenant_id: &str,
        lookup: &ResolvedIdentifiers,
    ) -> DbResult<Vec<ApiProduct>> {
        let query = EntityQuery::select("SELECT p.* FROM api_products p")
            .filter_eq("p.tenant_id", tenant_id);
        let value = lookup.primary_value.as_str();

        let query = match lookup.primary {
            Identifier::ApiProductName => query.filter_eq("p.name", value),
            Identifier::AppId => query
                .join(PRODUCT_BINDINGS)
                .join(BINDING_CREDENTIAL)
                .filter_eq("c.app_id", value),
            Identifier::AppName => query
                .join(PRODUCT_BINDINGS)
                .join(BINDING_CREDENTIAL)
                .join(CREDENTIAL_APP)
                .filter_eq("a.name", value),
            Identifier::ConsumerKey => query
                .join(PRODUCT_BINDINGS)
                .filter_eq("cb.credential_id", value),
            other => return Err(unsupported(lookup, other)),
        };

        // Owner secondaries narrow through the app; only reachable from appname.
        let query = match lookup.secondary_identifier() {
            None | Some(Identifier::ApiResource) => query,
            Some(_) if query.has_join(CREDENTIAL_APP.name) => filter_app_owner(query, lookup)?,
            Some(other) => return Err(unsupported(lookup, other)),
        };

        let query = if query.has_join(PRODUCT_BINDINGS.name) {
            query.order_by("cb.seq")
        } else {
            query.order_by("p.name").order_by("p.id")
        };

        let rows = query.fetch_all(&self.pool).await?;
        let mut seen = HashSet::new();
        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            let product = Self::parse_api_product(row)?;
            if seen.insert(product.id.clone()) {
                products.push(product);
            }
        }

        if let Some((Identifier::ApiResource, resource)) = &lookup.secondary {
            products.retain(|p| p.resources.iter().any(|r| r == resource));
        }

        Ok(products)
    }
}
