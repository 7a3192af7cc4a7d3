//! Key material for decrypting stored credential secrets.
//!
//! Supports two backends:
//! - Environment variables (default for deployments)
//! - In-memory, optionally preloaded from configuration (tests and local runs)

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::config::SecretsConfig;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SecretResult<T> = Result<T, SecretError>;

/// Trait for reading named secrets.
#[async_trait]
pub trait SecretManager: Send + Sync {
    /// Get a secret by key. Returns None if not found.
    async fn get(&self, key: &str) -> SecretResult<Option<String>>;

    /// Set a secret. Not all backends support this.
    async fn set(&self, key: &str, value: &str) -> SecretResult<()>;

    /// Check if the secret manager is healthy/connected.
    async fn health_check(&self) -> SecretResult<()> {
        Ok(())
    }
}

/// Build the configured secret manager, if any.
pub fn from_config(config: &SecretsConfig) -> Option<Arc<dyn SecretManager>> {
    match config {
        SecretsConfig::None => None,
        SecretsConfig::Env => Some(Arc::new(EnvSecretManager::new())),
        SecretsConfig::Memory { values } => Some(Arc::new(MemorySecretManager::with_values(
            values.clone(),
        ))),
    }
}

/// In-memory secret manager
pub struct MemorySecretManager {
    secrets: DashMap<String, String>,
}

impl MemorySecretManager {
    pub fn new() -> Self {
        Self {
            secrets: DashMap::new(),
        }
    }

    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            secrets: values.into_iter().collect(),
        }
    }
}

impl Default for MemorySecretManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretManager for MemorySecretManager {
    async fn get(&self, key: &str) -> SecretResult<Option<String>> {
        Ok(self.secrets.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> SecretResult<()> {
        self.secrets.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Environment-based secret manager (reads from env vars)
pub struct EnvSecretManager;

impl EnvSecretManager {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvSecretManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretManager for EnvSecretManager {
    async fn get(&self, key: &str) -> SecretResult<Option<String>> {
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::Internal(format!(
                "Environment variable {key} is not valid UTF-8"
            ))),
        }
    }

    async fn set(&self, _key: &str, _value: &str) -> SecretResult<()> {
        Err(SecretError::Unsupported(
            "Cannot set secrets in environment manager".to_string(),
        ))
    }
}
