mod handlers;
mod models;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use handlers::{bfhl, health, index, not_found};
pub use models::{BfhlResponse, ErrorResponse, HealthResponse, IndexResponse, RouteInfo};

/// Routes of the service. Unknown paths and unsupported methods on known
/// paths both answer with the 404 envelope.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/bfhl", post(bfhl).fallback(not_found))
        .route("/health", get(health).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
}
