use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports the service version and which models the analyzer is wired to.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let analyzer = &state.analyzer;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "embedding_model": analyzer.store().embedder().model_name(),
        "llm_model": analyzer.llm().model_name(),
        "llm_configured": analyzer.llm().ensure_ready().is_ok(),
        "active_collections": analyzer.store().collection_count(),
    }))
}
