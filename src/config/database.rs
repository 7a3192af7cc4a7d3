use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Database configuration.
///
/// The database holds the entity data keys are verified against: data
/// scopes, developers, companies, apps, credentials, API products and their
/// attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub enum DatabaseConfig {
    /// SQLite database file.
    Sqlite(SqliteConfig),
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::Sqlite(SqliteConfig::default())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            DatabaseConfig::Sqlite(c) => c.validate(),
        }
    }

    pub fn run_migrations(&self) -> bool {
        match self {
            DatabaseConfig::Sqlite(c) => c.run_migrations,
        }
    }

    /// Label of the data version served at startup.
    pub fn snapshot_version(&self) -> &str {
        match self {
            DatabaseConfig::Sqlite(c) => &c.snapshot_version,
        }
    }
}

/// SQLite configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    /// Use `:memory:` for an in-memory database (testing only).
    #[serde(default = "default_path")]
    pub path: String,

    /// Create the database file if it doesn't exist.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Run migrations on startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Enable WAL mode for better concurrency.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,

    /// Maximum number of connections in the pool.
    #[serde(default = "default_sqlite_max_connections")]
    pub max_connections: u32,

    /// Open the database read-only. Migrations cannot run in this mode.
    #[serde(default)]
    pub read_only: bool,

    /// Version label of the initial data snapshot.
    #[serde(default = "default_snapshot_version")]
    pub snapshot_version: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            create_if_missing: true,
            run_migrations: true,
            wal_mode: true,
            busy_timeout_ms: default_busy_timeout(),
            max_connections: default_sqlite_max_connections(),
            read_only: false,
            snapshot_version: default_snapshot_version(),
        }
    }
}

impl SqliteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::Validation(
                "SQLite path cannot be empty".into(),
            ));
        }
        if self.read_only && self.run_migrations {
            return Err(ConfigError::Validation(
                "database.run_migrations must be false when database.read_only is set".into(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_path() -> String {
    "keygate.db".to_string()
}

fn default_busy_timeout() -> u64 {
    5000 // 5 seconds
}

fn default_sqlite_max_connections() -> u32 {
    5
}

fn default_snapshot_version() -> String {
    "initial".to_string()
}

fn default_true() -> bool {
    true
}
