//! Shared database repository test infrastructure
//!
//! Each repository has a test module containing:
//! - Test functions that take a [`DbPool`](crate::db::DbPool) loaded with the
//!   fixture from [`seed`]
//! - A `sqlite_test!` block that runs them against an in-memory database
//!
//! The seed helpers are also used by the verifier and HTTP tests.

pub mod seed;
