//! Identifier-driven entity lookups.
//!
//! Callers supply up to two identifiers (for example an app name and a
//! developer email). The `tree` lists which identifiers may act as the
//! primary key for each endpoint and which secondaries may narrow it; the
//! [`resolver`] turns what was supplied into a canonical pair or rejects it;
//! the `service` runs the lookup against the current data snapshot.

mod resolver;
mod service;
mod tree;

pub use resolver::*;
pub use service::*;
pub use tree::*;
