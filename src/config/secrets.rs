//! Secrets manager configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Where per-organization key material comes from.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretsConfig {
    /// No secrets manager. Encrypted values cannot be decrypted.
    #[default]
    None,

    /// Environment variable-based secrets
    /// Keys are looked up directly as environment variable names.
    Env,

    /// Secrets listed inline. Intended for tests and local setups.
    Memory {
        #[serde(default)]
        values: HashMap<String, String>,
    },
}

impl SecretsConfig {
    pub fn is_none(&self) -> bool {
        matches!(self, SecretsConfig::None)
    }
}

impl std::fmt::Debug for SecretsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretsConfig::None => f.write_str("None"),
            SecretsConfig::Env => f.write_str("Env"),
            SecretsConfig::Memory { values } => {
                let mut names: Vec<_> = values.keys().collect();
                names.sort();
                f.debug_struct("Memory")
                    .field("names", &names)
                    .field("values", &"****")
                    .finish()
            }
        }
    }
}

/// Cipher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CipherConfig {
    /// Prefix of the secret holding an organization's key. The organization
    /// name is appended upper-cased, with non-alphanumerics as `_`.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_key_prefix() -> String {
    "KEYGATE_ORG_KEY_".to_string()
}
