//! Fixture data shared by repository, engine and HTTP tests.
//!
//! Organization `acme` maps to tenant `t-acme`:
//!
//! | credential | app (owner) | bindings |
//! |---|---|---|
//! | `key-weather` | weather (dev-jane) | weather-product, catchall |
//! | `key-billing` | billing (co-globex) | billing-product |
//! | `key-revoked` (REVOKED) | weather (dev-jane) | weather-product |
//! | `key-legacy` | legacy (dev-sam, INACTIVE) | catchall |
//! | `key-pending-app` | pending (dev-jane, app PENDING) | catchall |
//! | `key-hooli` | hooli-app (co-hooli, INACTIVE) | catchall |
//! | `key-unapproved-binding` | weather (dev-jane) | weather-product (PENDING) |
//! | `key-weather-co` | weather (co-globex) | billing-product |
//!
//! Organization `initech` maps to tenant `t-initech` and reuses some ids.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::models::{AppOwner, kind};

pub const ORG: &str = "acme";
pub const TENANT: &str = "t-acme";
pub const OTHER_ORG: &str = "initech";
pub const OTHER_TENANT: &str = "t-initech";

pub const DEV_JANE: &str = "dev-jane";
pub const DEV_SAM: &str = "dev-sam";
pub const CO_GLOBEX: &str = "co-globex";
pub const CO_HOOLI: &str = "co-hooli";

pub const APP_WEATHER: &str = "app-weather";
pub const APP_BILLING: &str = "app-billing";
pub const APP_LEGACY: &str = "app-legacy";
pub const APP_PENDING: &str = "app-pending";
pub const APP_HOOLI: &str = "app-hooli";
pub const APP_WEATHER_CO: &str = "app-weather-co";

pub const PROD_WEATHER: &str = "prod-weather";
pub const PROD_CATCHALL: &str = "prod-catchall";
pub const PROD_BILLING: &str = "prod-billing";

pub const KEY_WEATHER: &str = "key-weather";
pub const KEY_BILLING: &str = "key-billing";
pub const KEY_REVOKED: &str = "key-revoked";
pub const KEY_LEGACY: &str = "key-legacy";
pub const KEY_PENDING_APP: &str = "key-pending-app";
pub const KEY_HOOLI: &str = "key-hooli";
pub const KEY_UNAPPROVED_BINDING: &str = "key-unapproved-binding";
pub const KEY_WEATHER_CO: &str = "key-weather-co";
pub const KEY_INITECH: &str = "key-initech";

/// Fixed timestamp so payloads are reproducible.
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

fn json_list(items: &[&str]) -> String {
    serde_json::to_string(items).unwrap()
}

pub async fn insert_data_scope(pool: &SqlitePool, org: &str, tenant_id: &str) {
    sqlx::query("INSERT INTO data_scopes (id, org, tenant_id, created_at) VALUES (?, ?, ?, ?)")
        .bind(format!("scope-{org}-{tenant_id}"))
        .bind(org)
        .bind(tenant_id)
        .bind(fixture_time())
        .execute(pool)
        .await
        .expect("Failed to insert data scope");
}

pub async fn insert_developer(pool: &SqlitePool, tenant_id: &str, id: &str, email: &str, status: &str) {
    let username = email.split('@').next().unwrap_or(email);
    sqlx::query(
        r#"
        INSERT INTO developers (tenant_id, id, username, first_name, last_name, email, status,
                                created_at, created_by, updated_at, updated_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'seed', ?, 'seed')
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .bind(username)
    .bind(username)
    .bind("Tester")
    .bind(email)
    .bind(status)
    .bind(fixture_time())
    .bind(fixture_time())
    .execute(pool)
    .await
    .expect("Failed to insert developer");
}

pub async fn insert_company(pool: &SqlitePool, tenant_id: &str, id: &str, name: &str, status: &str) {
    sqlx::query(
        r#"
        INSERT INTO companies (tenant_id, id, name, display_name, status,
                               created_at, created_by, updated_at, updated_by)
        VALUES (?, ?, ?, ?, ?, ?, 'seed', ?, 'seed')
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .bind(name)
    .bind(name.to_uppercase())
    .bind(status)
    .bind(fixture_time())
    .bind(fixture_time())
    .execute(pool)
    .await
    .expect("Failed to insert company");
}

pub async fn insert_company_developer(
    pool: &SqlitePool,
    tenant_id: &str,
    company_id: &str,
    developer_id: &str,
    roles: &[&str],
) {
    sqlx::query(
        r#"
        INSERT INTO company_developers (tenant_id, company_id, developer_id, roles,
                                        created_at, created_by, updated_at, updated_by)
        VALUES (?, ?, ?, ?, ?, 'seed', ?, 'seed')
        "#,
    )
    .bind(tenant_id)
    .bind(company_id)
    .bind(developer_id)
    .bind(json_list(roles))
    .bind(fixture_time())
    .bind(fixture_time())
    .execute(pool)
    .await
    .expect("Failed to insert company developer");
}

pub async fn insert_app(
    pool: &SqlitePool,
    tenant_id: &str,
    id: &str,
    name: &str,
    owner: &AppOwner,
    status: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO apps (tenant_id, id, name, display_name, access_type, callback_url, status,
                          app_family, developer_id, company_id,
                          created_at, created_by, updated_at, updated_by)
        VALUES (?, ?, ?, ?, 'read', ?, ?, 'default', ?, ?, ?, 'seed', ?, 'seed')
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .bind(name)
    .bind(format!("{name} app"))
    .bind(format!("https://{name}.example.com/callback"))
    .bind(status)
    .bind(owner.developer_id())
    .bind(owner.company_id())
    .bind(fixture_time())
    .bind(fixture_time())
    .execute(pool)
    .await
    .expect("Failed to insert app");
}

pub async fn insert_product(
    pool: &SqlitePool,
    tenant_id: &str,
    id: &str,
    name: &str,
    environments: &[&str],
    proxies: &[&str],
    resources: &[&str],
) {
    sqlx::query(
        r#"
        INSERT INTO api_products (tenant_id, id, name, display_name, description, status,
                                  approval_type, scopes, environments, proxies, resources,
                                  created_at, created_by, updated_at, updated_by)
        VALUES (?, ?, ?, ?, '', 'approved', 'auto', '[]', ?, ?, ?, ?, 'seed', ?, 'seed')
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .bind(name)
    .bind(name.replace('-', " "))
    .bind(json_list(environments))
    .bind(json_list(proxies))
    .bind(json_list(resources))
    .bind(fixture_time())
    .bind(fixture_time())
    .execute(pool)
    .await
    .expect("Failed to insert api product");
}

pub async fn set_quota(
    pool: &SqlitePool,
    tenant_id: &str,
    product_id: &str,
    limit: &str,
    interval: &str,
    time_unit: &str,
) {
    sqlx::query(
        r#"
        UPDATE api_products SET quota_limit = ?, quota_interval = ?, quota_time_unit = ?
        WHERE tenant_id = ? AND id = ?
        "#,
    )
    .bind(limit)
    .bind(interval)
    .bind(time_unit)
    .bind(tenant_id)
    .bind(product_id)
    .execute(pool)
    .await
    .expect("Failed to set quota");
}

pub async fn insert_credential(
    pool: &SqlitePool,
    tenant_id: &str,
    id: &str,
    app_id: &str,
    secret: &str,
    status: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO credentials (tenant_id, id, app_id, consumer_secret, status, issued_at,
                                 expires_at, redirect_uris,
                                 created_at, created_by, updated_at, updated_by)
        VALUES (?, ?, ?, ?, ?, ?, NULL, ?, ?, 'seed', ?, 'seed')
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .bind(app_id)
    .bind(secret)
    .bind(status)
    .bind(fixture_time())
    .bind(json_list(&["https://example.com/oauth"]))
    .bind(fixture_time())
    .bind(fixture_time())
    .execute(pool)
    .await
    .expect("Failed to insert credential");
}

pub async fn bind_product(
    pool: &SqlitePool,
    tenant_id: &str,
    credential_id: &str,
    product_id: &str,
    status: &str,
) {
    sqlx::query(
        "INSERT INTO credential_products (tenant_id, credential_id, product_id, status) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(tenant_id)
    .bind(credential_id)
    .bind(product_id)
    .bind(status)
    .execute(pool)
    .await
    .expect("Failed to bind product");
}

pub async fn insert_attribute(
    pool: &SqlitePool,
    tenant_id: &str,
    entity_id: &str,
    attribute_kind: &str,
    name: &str,
    value: &str,
) {
    sqlx::query(
        "INSERT INTO attributes (tenant_id, entity_id, kind, name, value) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(tenant_id)
    .bind(entity_id)
    .bind(attribute_kind)
    .bind(name)
    .bind(value)
    .execute(pool)
    .await
    .expect("Failed to insert attribute");
}

/// Load the standard fixture described in the module docs.
pub async fn seed_fixture(pool: &SqlitePool) {
    let t = TENANT;
    insert_data_scope(pool, ORG, t).await;
    insert_data_scope(pool, OTHER_ORG, OTHER_TENANT).await;

    insert_developer(pool, t, DEV_JANE, "jane@acme.io", "ACTIVE").await;
    insert_developer(pool, t, DEV_SAM, "sam@acme.io", "inactive").await;
    insert_company(pool, t, CO_GLOBEX, "globex", "active").await;
    insert_company(pool, t, CO_HOOLI, "hooli", "INACTIVE").await;
    insert_company_developer(pool, t, CO_GLOBEX, DEV_JANE, &["admin"]).await;
    insert_company_developer(pool, t, CO_GLOBEX, DEV_SAM, &["member"]).await;

    let jane = AppOwner::Developer(DEV_JANE.into());
    let sam = AppOwner::Developer(DEV_SAM.into());
    let globex = AppOwner::Company(CO_GLOBEX.into());
    let hooli = AppOwner::Company(CO_HOOLI.into());
    insert_app(pool, t, APP_WEATHER, "weather", &jane, "APPROVED").await;
    insert_app(pool, t, APP_BILLING, "billing", &globex, "approved").await;
    insert_app(pool, t, APP_LEGACY, "legacy", &sam, "APPROVED").await;
    insert_app(pool, t, APP_PENDING, "pending", &jane, "PENDING").await;
    insert_app(pool, t, APP_HOOLI, "hooli-app", &hooli, "APPROVED").await;
    insert_app(pool, t, APP_WEATHER_CO, "weather", &globex, "APPROVED").await;

    insert_product(
        pool,
        t,
        PROD_WEATHER,
        "weather-product",
        &["test", "prod"],
        &["weather-v1"],
        &["/forecast/**"],
    )
    .await;
    set_quota(pool, t, PROD_WEATHER, "1000", "1", "minute").await;
    insert_product(pool, t, PROD_CATCHALL, "catchall", &["test", "prod"], &[], &["/**"]).await;
    insert_product(
        pool,
        t,
        PROD_BILLING,
        "billing-product",
        &["prod"],
        &["billing-v1"],
        &["/invoices/*"],
    )
    .await;

    let credentials = [
        (KEY_WEATHER, APP_WEATHER, "weather-secret", "APPROVED"),
        (KEY_BILLING, APP_BILLING, "billing-secret", "APPROVED"),
        (KEY_REVOKED, APP_WEATHER, "revoked-secret", "REVOKED"),
        (KEY_LEGACY, APP_LEGACY, "legacy-secret", "APPROVED"),
        (KEY_PENDING_APP, APP_PENDING, "pending-secret", "APPROVED"),
        (KEY_HOOLI, APP_HOOLI, "hooli-secret", "APPROVED"),
        (KEY_UNAPPROVED_BINDING, APP_WEATHER, "unapproved-secret", "approved"),
        (KEY_WEATHER_CO, APP_WEATHER_CO, "weather-co-secret", "APPROVED"),
    ];
    for (key, app, secret, status) in credentials {
        insert_credential(pool, t, key, app, secret, status).await;
    }

    bind_product(pool, t, KEY_WEATHER, PROD_WEATHER, "APPROVED").await;
    bind_product(pool, t, KEY_WEATHER, PROD_CATCHALL, "APPROVED").await;
    bind_product(pool, t, KEY_BILLING, PROD_BILLING, "APPROVED").await;
    bind_product(pool, t, KEY_REVOKED, PROD_WEATHER, "APPROVED").await;
    bind_product(pool, t, KEY_LEGACY, PROD_CATCHALL, "APPROVED").await;
    bind_product(pool, t, KEY_PENDING_APP, PROD_CATCHALL, "APPROVED").await;
    bind_product(pool, t, KEY_HOOLI, PROD_CATCHALL, "APPROVED").await;
    bind_product(pool, t, KEY_UNAPPROVED_BINDING, PROD_WEATHER, "PENDING").await;
    bind_product(pool, t, KEY_WEATHER_CO, PROD_BILLING, "APPROVED").await;

    insert_attribute(pool, t, DEV_JANE, kind::DEVELOPER, "tier", "gold").await;
    insert_attribute(pool, t, APP_WEATHER, kind::APP, "region", "eu").await;
    insert_attribute(pool, t, KEY_WEATHER, kind::CREDENTIAL, "note", "primary").await;
    insert_attribute(pool, t, PROD_WEATHER, kind::API_PRODUCT, "visibility", "public").await;
    insert_attribute(pool, t, PROD_WEATHER, kind::API_PRODUCT, "owner", "team-a").await;
    insert_attribute(pool, t, CO_GLOBEX, kind::COMPANY, "industry", "energy").await;

    // Same developer id in another tenant
    let o = OTHER_TENANT;
    insert_developer(pool, o, DEV_JANE, "jane@initech.io", "ACTIVE").await;
    insert_app(pool, o, "app-initech", "tps-reports", &jane, "APPROVED").await;
    insert_product(pool, o, PROD_CATCHALL, "catchall", &[], &[], &[]).await;
    insert_credential(pool, o, KEY_INITECH, "app-initech", "initech-secret", "APPROVED").await;
    bind_product(pool, o, KEY_INITECH, PROD_CATCHALL, "APPROVED").await;
    insert_attribute(pool, o, DEV_JANE, kind::DEVELOPER, "tier", "bronze").await;
}
