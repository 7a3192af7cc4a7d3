mod error;
pub mod query;
pub mod repos;
mod snapshot;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;
pub use snapshot::{DbSnapshot, SnapshotHandle};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once per pool.
struct CachedRepos {
    data_scopes: Arc<dyn DataScopeRepo>,
    credentials: Arc<dyn CredentialRepo>,
    apps: Arc<dyn AppRepo>,
    developers: Arc<dyn DeveloperRepo>,
    companies: Arc<dyn CompanyRepo>,
    company_developers: Arc<dyn CompanyDeveloperRepo>,
    api_products: Arc<dyn ApiProductRepo>,
    attributes: Arc<dyn AttributeRepo>,
}

/// Database pool with its repositories.
///
/// Repositories are cached at construction time to avoid allocation on each access.
pub struct DbPool {
    pool: SqlitePool,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    pub fn from_sqlite(pool: SqlitePool) -> Self {
        let repos = CachedRepos {
            data_scopes: Arc::new(sqlite::SqliteDataScopeRepo::new(pool.clone())),
            credentials: Arc::new(sqlite::SqliteCredentialRepo::new(pool.clone())),
            apps: Arc::new(sqlite::SqliteAppRepo::new(pool.clone())),
            developers: Arc::new(sqlite::SqliteDeveloperRepo::new(pool.clone())),
            companies: Arc::new(sqlite::SqliteCompanyRepo::new(pool.clone())),
            company_developers: Arc::new(sqlite::SqliteCompanyDeveloperRepo::new(pool.clone())),
            api_products: Arc::new(sqlite::SqliteApiProductRepo::new(pool.clone())),
            attributes: Arc::new(sqlite::SqliteAttributeRepo::new(pool.clone())),
        };
        DbPool { pool, repos }
    }

    /// Create a database pool from configuration
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::Sqlite(cfg) => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(
                        sqlx::sqlite::SqliteConnectOptions::new()
                            .filename(&cfg.path)
                            .create_if_missing(cfg.create_if_missing)
                            .read_only(cfg.read_only)
                            .journal_mode(if cfg.wal_mode {
                                sqlx::sqlite::SqliteJournalMode::Wal
                            } else {
                                sqlx::sqlite::SqliteJournalMode::Delete
                            })
                            .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms)),
                    )
                    .await?;

                Ok(Self::from_sqlite(pool))
            }
        }
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        tracing::info!("Running SQLite migrations");
        sqlx::migrate!("./migrations_sqlx/sqlite")
            .run(&self.pool)
            .await?;
        tracing::info!("SQLite migrations completed successfully");
        Ok(())
    }

    pub fn data_scopes(&self) -> Arc<dyn DataScopeRepo> {
        Arc::clone(&self.repos.data_scopes)
    }

    pub fn credentials(&self) -> Arc<dyn CredentialRepo> {
        Arc::clone(&self.repos.credentials)
    }

    pub fn apps(&self) -> Arc<dyn AppRepo> {
        Arc::clone(&self.repos.apps)
    }

    pub fn developers(&self) -> Arc<dyn DeveloperRepo> {
        Arc::clone(&self.repos.developers)
    }

    pub fn companies(&self) -> Arc<dyn CompanyRepo> {
        Arc::clone(&self.repos.companies)
    }

    pub fn company_developers(&self) -> Arc<dyn CompanyDeveloperRepo> {
        Arc::clone(&self.repos.company_developers)
    }

    pub fn api_products(&self) -> Arc<dyn ApiProductRepo> {
        Arc::clone(&self.repos.api_products)
    }

    pub fn attributes(&self) -> Arc<dyn AttributeRepo> {
        Arc::clone(&self.repos.attributes)
    }

    /// Check that the database answers queries.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close all connections. Requests still holding the pool will fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
