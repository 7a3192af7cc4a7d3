//! Configuration module for keygate.
//!
//! The service is configured via a TOML file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! type = "sqlite"
//! path = "${KEYGATE_DATA_DIR}/keygate.db"
//!
//! [secrets]
//! type = "env"
//! ```

mod database;
mod observability;
mod secrets;
mod server;
mod verify;

use std::{path::Path, sync::LazyLock};

pub use database::*;
pub use observability::*;
use regex::Regex;
pub use secrets::*;
use serde::{Deserialize, Serialize};
pub use server::*;
pub use verify::*;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Root configuration.
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Entity store.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Observability configuration (logging, metrics).
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Source of per-organization cipher keys.
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Secret decryption.
    #[serde(default)]
    pub cipher: CipherConfig,

    /// Key verification defaults.
    #[serde(default)]
    pub verify: VerifyConfig,
}

impl GatewayConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing required variables will cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let config: GatewayConfig = toml::from_str(&expanded).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and completeness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.observability.validate()?;

        if self.cipher.key_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "cipher.key_prefix cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Expand environment variables in the format `${VAR_NAME}`.
/// Skips commented lines (lines where content before the variable is a comment).
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(input.len());

    for line in input.lines() {
        let comment_pos = line.find('#');

        let mut line_result = String::with_capacity(line.len());
        let mut last_end = 0;

        for cap in ENV_VAR.captures_iter(line) {
            let Some(whole) = cap.get(0) else {
                continue;
            };

            // Variables inside a comment stay as written
            if let Some(pos) = comment_pos
                && whole.start() >= pos
            {
                continue;
            }

            line_result.push_str(&line[last_end..whole.start()]);

            let var_name = &cap[1];
            let value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
            line_result.push_str(&value);

            last_end = whole.end();
        }

        line_result.push_str(&line[last_end..]);
        result.push_str(&line_result);
        result.push('\n');
    }

    // Remove trailing newline if input didn't have one
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GatewayConfig::from_str("").unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.verify.default_validate_proxies_and_envs);
        assert_eq!(config.cipher.key_prefix, "KEYGATE_ORG_KEY_");
        assert!(config.secrets.is_none());
        assert!(config.observability.metrics.enabled);
        let DatabaseConfig::Sqlite(sqlite) = &config.database;
        assert_eq!(sqlite.path, "keygate.db");
        assert_eq!(config.database.snapshot_version(), "initial");
    }

    #[test]
    fn test_full_config() {
        let config = GatewayConfig::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            timeout_secs = 5

            [database]
            type = "sqlite"
            path = "/var/lib/keygate/data.db"
            run_migrations = false
            read_only = true
            snapshot_version = "2024-06-01"

            [observability.logging]
            level = "debug"
            format = "json"

            [observability.metrics]
            enabled = false
            path = "/internal/metrics"

            [secrets]
            type = "memory"
            values = { KEYGATE_ORG_KEY_ACME = "a2V5" }

            [cipher]
            key_prefix = "ORG_KEY_"

            [verify]
            default_validate_proxies_and_envs = false
        "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.timeout().as_secs(), 5);
        assert!(!config.database.run_migrations());
        assert_eq!(config.database.snapshot_version(), "2024-06-01");
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert_eq!(config.observability.logging.level, LogLevel::Debug);
        assert_eq!(config.observability.metrics.path, "/internal/metrics");
        match &config.secrets {
            SecretsConfig::Memory { values } => {
                assert_eq!(values.get("KEYGATE_ORG_KEY_ACME").unwrap(), "a2V5");
            }
            other => panic!("expected memory secrets, got {other:?}"),
        }
        assert_eq!(config.cipher.key_prefix, "ORG_KEY_");
        assert!(!config.verify.default_validate_proxies_and_envs);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = GatewayConfig::from_str(
            r#"
            [server]
            prot = 8080
        "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_sqlite_path_rejected() {
        let err = GatewayConfig::from_str(
            r#"
            [database]
            type = "sqlite"
            path = ""
        "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("SQLite path cannot be empty"));
    }

    #[test]
    fn test_read_only_requires_migrations_off() {
        let err = GatewayConfig::from_str(
            r#"
            [database]
            type = "sqlite"
            read_only = true
        "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_metrics_path_must_be_absolute() {
        let err = GatewayConfig::from_str(
            r#"
            [observability.metrics]
            path = "metrics"
        "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 7070").unwrap();

        let config = GatewayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 7070);
    }

    #[test]
    fn test_from_missing_file() {
        let err = GatewayConfig::from_file("/nonexistent/keygate.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }

    #[test]
    fn test_env_var_expansion() {
        temp_env::with_var("KEYGATE_TEST_DB_PATH", Some("/tmp/kg.db"), || {
            let config = GatewayConfig::from_str(
                r#"
                [database]
                type = "sqlite"
                path = "${KEYGATE_TEST_DB_PATH}"
            "#,
            )
            .unwrap();
            let DatabaseConfig::Sqlite(sqlite) = &config.database;
            assert_eq!(sqlite.path, "/tmp/kg.db");
        });
    }

    #[test]
    fn test_missing_env_var_is_an_error() {
        temp_env::with_var_unset("KEYGATE_TEST_UNSET", || {
            let err = expand_env_vars("path = \"${KEYGATE_TEST_UNSET}\"").unwrap_err();
            assert!(
                matches!(err, ConfigError::EnvVarNotFound(ref name) if name == "KEYGATE_TEST_UNSET")
            );
        });
    }

    #[test]
    fn test_env_var_in_comment_ignored() {
        let result = expand_env_vars("# path = \"${NONEXISTENT_VAR}\"").unwrap();
        assert_eq!(result, "# path = \"${NONEXISTENT_VAR}\"");
    }

    #[test]
    fn test_env_var_after_comment_ignored() {
        let result = expand_env_vars("key = \"value\" # ${NONEXISTENT_VAR}").unwrap();
        assert_eq!(result, "key = \"value\" # ${NONEXISTENT_VAR}");
    }

    #[test]
    fn test_multiline_with_comments() {
        temp_env::with_var("KEYGATE_TEST_MULTI", Some("value1"), || {
            let input = r#"key1 = "${KEYGATE_TEST_MULTI}"
# key2 = "${NONEXISTENT}"
key3 = "literal""#;
            let result = expand_env_vars(input).unwrap();
            assert_eq!(
                result,
                r#"key1 = "value1"
# key2 = "${NONEXISTENT}"
key3 = "literal""#
            );
        });
    }
}
