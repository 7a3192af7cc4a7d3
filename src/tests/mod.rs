//! End-to-end tests driving the HTTP application against the seeded fixture.

pub mod support;
