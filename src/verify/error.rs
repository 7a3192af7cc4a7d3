use thiserror::Error;

use crate::{cipher::CipherError, db::DbError};

/// Failures while verifying a key. Authorization denials are not errors; see
/// [`Decision::Denied`](super::Decision::Denied).
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("{0}")]
    Validation(String),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] DbError),

    #[error("Secret decryption failed: {0}")]
    Decrypt(#[from] CipherError),
}

pub type VerifyResult<T> = Result<T, VerifyError>;
