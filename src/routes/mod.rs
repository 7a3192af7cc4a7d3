pub mod entities;
pub mod error;
pub mod health;
pub mod verify;

use axum::{
    Router,
    routing::{get, post},
};

pub use error::ApiError;

use crate::AppState;

/// Key verification and entity lookup routes.
pub fn get_api_routes() -> Router<AppState> {
    Router::new()
        .route("/verifiers/apikey", post(verify::verify_api_key))
        .route("/entities/{endpoint}", get(entities::lookup_entities))
}
