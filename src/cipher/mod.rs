//! Decrypt-on-read for stored credential secrets.
//!
//! Encrypted values carry a `{ALGORITHM/MODE/PADDING}` prefix followed by
//! base64 of `nonce || ciphertext || tag`. Only `AES/GCM/NoPadding` with a
//! 256-bit key is supported. Values without the prefix are stored in clear
//! and pass through unchanged.
//!
//! Keys are per organization. The key for organization `acme-eu` is the
//! base64 secret named `<key_prefix>ACME_EU`, fetched from the configured
//! [`SecretManager`] and cached after first use.

use std::sync::{Arc, LazyLock};

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use dashmap::DashMap;
use rand::RngCore;
use regex::Regex;
use thiserror::Error;

use crate::secrets::{SecretError, SecretManager};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const AES_GCM_PREFIX: &str = "{AES/GCM/NoPadding}";

static ENCRYPTED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{([^/{}]+)/([^/{}]+)/([^/{}]+)\}(.*)$").unwrap());

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Unsupported cipher {0}")]
    UnsupportedAlgorithm(String),

    #[error("No key configured for organization {org} (secret {secret})")]
    KeyNotFound { org: String, secret: String },

    #[error("No secrets backend configured for encrypted values")]
    NoKeySource,

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Malformed encrypted value: {0}")]
    Malformed(String),

    #[error("Decryption failed")]
    Decrypt,

    #[error("Encryption failed")]
    Encrypt,

    #[error(transparent)]
    Secret(#[from] SecretError),
}

pub type CipherResult<T> = Result<T, CipherError>;

/// Encrypt and decrypt values under an organization's key.
#[async_trait]
pub trait Cipher: Send + Sync {
    async fn encrypt(&self, org: &str, plaintext: &str) -> CipherResult<String>;

    /// Decrypt a stored value. Values without a cipher prefix are returned as is.
    async fn decrypt(&self, org: &str, value: &str) -> CipherResult<String>;
}

/// Parts of a prefixed encrypted value.
#[derive(Debug, PartialEq, Eq)]
pub struct EncryptedValue<'a> {
    pub algorithm: &'a str,
    pub mode: &'a str,
    pub padding: &'a str,
    pub payload: &'a str,
}

impl<'a> EncryptedValue<'a> {
    /// Split a stored value, or `None` if it carries no cipher prefix.
    pub fn parse(value: &'a str) -> Option<Self> {
        let caps = ENCRYPTED_VALUE.captures(value)?;
        let part = |i| caps.get(i).map_or("", |m| m.as_str());
        Some(Self {
            algorithm: part(1),
            mode: part(2),
            padding: part(3),
            payload: part(4),
        })
    }

    fn is_aes_gcm(&self) -> bool {
        self.algorithm.eq_ignore_ascii_case("AES")
            && self.mode.eq_ignore_ascii_case("GCM")
            && self.padding.eq_ignore_ascii_case("NoPadding")
    }
}

/// Name of the secret holding an organization's key.
pub fn key_secret_name(prefix: &str, org: &str) -> String {
    let normalized: String = org
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{prefix}{normalized}")
}

/// Generate a random 256-bit key, base64 encoded.
pub fn generate_key() -> String {
    let mut key = [0u8; KEY_LEN];
    rand::thread_rng().fill_bytes(&mut key);
    STANDARD.encode(key)
}

/// AES-256-GCM cipher with per-organization keys.
pub struct AesGcmCipher {
    secrets: Option<Arc<dyn SecretManager>>,
    key_prefix: String,
    keys: DashMap<String, [u8; KEY_LEN]>,
}

impl AesGcmCipher {
    pub fn new(secrets: Option<Arc<dyn SecretManager>>, key_prefix: impl Into<String>) -> Self {
        Self {
            secrets,
            key_prefix: key_prefix.into(),
            keys: DashMap::new(),
        }
    }

    async fn org_key(&self, org: &str) -> CipherResult<[u8; KEY_LEN]> {
        let secret = key_secret_name(&self.key_prefix, org);
        if let Some(key) = self.keys.get(&secret) {
            return Ok(*key);
        }

        let secrets = self.secrets.as_ref().ok_or(CipherError::NoKeySource)?;
        let encoded = secrets
            .get(&secret)
            .await?
            .ok_or_else(|| CipherError::KeyNotFound {
                org: org.to_string(),
                secret: secret.clone(),
            })?;

        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CipherError::InvalidKey(format!("{secret}: {e}")))?;
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            CipherError::InvalidKey(format!(
                "{secret}: expected {KEY_LEN} bytes, got {}",
                b.len()
            ))
        })?;

        tracing::debug!(org, secret = %secret, "Loaded organization key");
        self.keys.insert(secret, key);
        Ok(key)
    }
}

#[async_trait]
impl Cipher for AesGcmCipher {
    async fn encrypt(&self, org: &str, plaintext: &str) -> CipherResult<String> {
        let key = self.org_key(org).await?;
        let cipher = Aes256Gcm::new((&key).into());

        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(format!("{AES_GCM_PREFIX}{}", STANDARD.encode(payload)))
    }

    async fn decrypt(&self, org: &str, value: &str) -> CipherResult<String> {
        let Some(encrypted) = EncryptedValue::parse(value) else {
            return Ok(value.to_string());
        };
        if !encrypted.is_aes_gcm() {
            return Err(CipherError::UnsupportedAlgorithm(format!(
                "{}/{}/{}",
                encrypted.algorithm, encrypted.mode, encrypted.padding
            )));
        }

        let payload = STANDARD
            .decode(encrypted.payload)
            .map_err(|e| CipherError::Malformed(e.to_string()))?;
        if payload.len() <= NONCE_LEN {
            return Err(CipherError::Malformed(format!(
                "payload is {} bytes",
                payload.len()
            )));
        }
        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);

        let key = self.org_key(org).await?;
        let plaintext = Aes256Gcm::new((&key).into())
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|e| CipherError::Malformed(e.to_string()))
    }
}
