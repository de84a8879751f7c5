pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::document::handlers::handle_extract;
use crate::document::upload::MAX_UPLOAD_BYTES;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/documents/extract", post(handle_extract))
        .route("/api/v1/analyze/:schema", post(handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
