use std::sync::Arc;

use crate::analysis::pipeline::Analyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the loaded embedding model and the LLM client; built once in `main`.
    pub analyzer: Arc<Analyzer>,
}
