//! Entity status values.
//!
//! Statuses are stored as free-form strings. Comparisons are case-insensitive
//! and values are upper-cased when read from the store.

/// Status an app, credential or product binding must carry to be usable.
pub const STATUS_APPROVED: &str = "APPROVED";

/// Status a developer or company must carry for its apps to be usable.
pub const STATUS_ACTIVE: &str = "ACTIVE";

/// Case-insensitive status comparison.
pub fn status_is(actual: &str, expected: &str) -> bool {
    actual.trim().eq_ignore_ascii_case(expected)
}

/// Canonical (trimmed, upper-cased) form of a status value.
pub fn canonical_status(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
