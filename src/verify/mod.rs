//! API key verification.
//!
//! A presented key is looked up in the organization, the statuses of its
//! owner, app and credential are checked, and the approved products bound to
//! the credential are narrowed to the one governing the request. The outcome
//! is a [`Decision`]: an authorized payload or a coded denial.

mod decision;
mod engine;
mod error;
pub mod matcher;
mod request;
mod response;
pub mod shortlist;

pub use decision::{Decision, Denial, DenialCode};
pub use engine::{Verifier, validate_context};
pub use error::{VerifyError, VerifyResult};
pub use request::{VERIFY_ACTION, VerifyApiKey, VerifyApiKeyRequest};
pub use response::*;
