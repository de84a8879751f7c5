use std::sync::Arc;

use crate::llm_client::ChatBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. A `ChatModel` in production, a mock in tests.
    pub llm: Arc<dyn ChatBackend>,
}
