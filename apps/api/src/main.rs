mod analysis;
mod config;
mod embedding;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::extractor::PdfTextExtractor;
use crate::analysis::pipeline::Analyzer;
use crate::analysis::template::BraceTemplate;
use crate::config::Config;
use crate::embedding::{Embedder, FastEmbedder, VectorStore};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Load the embedding model up front; without it no analysis can run
    let cache_dir = config.embedding_cache_dir.clone();
    let embedder = tokio::task::spawn_blocking(move || FastEmbedder::load(cache_dir))
        .await
        .context("Embedding model loader panicked")?
        .context("Failed to load embedding model")?;
    info!(
        "Embedder ready: {} ({} dims)",
        embedder.model_name(),
        embedder.dimension()
    );

    // Initialize LLM client (a missing key is reported per request, not at startup)
    let llm = GeminiClient::new(config.google_api_key.clone(), config.llm_settings())
        .context("Failed to build LLM client")?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", config.gemini_model);
    } else {
        warn!("GOOGLE_API_KEY is not set; analyses will fail until it is configured");
    }

    let settings = config.analyzer_settings()?;
    info!(
        "Chunking {} chars with {} overlap, retrieving top {}",
        settings.chunking.size(),
        settings.chunking.overlap(),
        settings.top_k
    );

    let analyzer = Analyzer::new(
        Arc::new(PdfTextExtractor),
        Arc::new(VectorStore::new(Arc::new(embedder))),
        Arc::new(llm),
        Arc::new(BraceTemplate),
        settings,
    );

    // Build app state
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
