use serde::{Deserialize, Serialize};

/// A name/value pair attached to a developer, company, app, credential or product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// Owning entity type (`developer`, `company`, `app`, `credential`, `apiproduct`)
    pub kind: String,
}

/// Entity types used as attribute kinds.
pub mod kind {
    pub const DEVELOPER: &str = "developer";
    pub const COMPANY: &str = "company";
    pub const APP: &str = "app";
    pub const CREDENTIAL: &str = "credential";
    pub const API_PRODUCT: &str = "apiproduct";
}

/// An entity together with its attributes, as returned by entity lookups.
#[derive(Debug, Clone, Serialize)]
pub struct WithAttributes<T> {
    #[serde(flatten)]
    pub entity: T,
    pub attributes: Vec<Attribute>,
}

impl<T> WithAttributes<T> {
    pub fn new(entity: T, attributes: Vec<Attribute>) -> Self {
        Self { entity, attributes }
    }
}
