//! Résumé analysis pipeline.
//!
//! Flow: extract → sanitize → chunk → index → query with JD → release →
//!       assemble prompt → LLM → repair/parse.
//!
//! Every stage failure aborts the run; [`Analyzer::analyze`] turns it into a
//! single-key `{"error": ...}` response. Nothing is retried here.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::analysis::assembler::assemble_prompt;
use crate::analysis::chunker::ChunkConfig;
use crate::analysis::error::AnalysisError;
use crate::analysis::extractor::{extract_document, ResumeDocument, TextExtractor};
use crate::analysis::prompts::RADAR_DIMENSIONS;
use crate::analysis::repair::parse_model_output;
use crate::analysis::result::{AnalysisResponse, AnalysisResult};
use crate::analysis::sanitizer::sanitize;
use crate::analysis::template::TemplateRenderer;
use crate::embedding::store::{RetrievedChunk, DEFAULT_TOP_K};
use crate::embedding::{EmbeddingError, VectorStore};
use crate::llm_client::LanguageModel;

/// Per-deployment retrieval parameters.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerSettings {
    pub chunking: ChunkConfig,
    pub top_k: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            chunking: ChunkConfig::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Runs résumé analyses. Built once at startup and shared across requests;
/// holds no per-request state.
pub struct Analyzer {
    extractor: Arc<dyn TextExtractor>,
    store: Arc<VectorStore>,
    llm: Arc<dyn LanguageModel>,
    renderer: Arc<dyn TemplateRenderer>,
    settings: AnalyzerSettings,
}

impl Analyzer {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        store: Arc<VectorStore>,
        llm: Arc<dyn LanguageModel>,
        renderer: Arc<dyn TemplateRenderer>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            extractor,
            store,
            llm,
            renderer,
            settings,
        }
    }

    pub fn llm(&self) -> &dyn LanguageModel {
        self.llm.as_ref()
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Analyzes the résumé at `file_path` against `jd_text`.
    ///
    /// Never fails: errors come back as [`AnalysisResponse::Failed`]. The HTTP
    /// handler uses [`Analyzer::try_analyze`] to map errors to status codes.
    #[allow(dead_code)]
    pub async fn analyze(&self, file_path: &Path, jd_text: &str) -> AnalysisResponse {
        match self.try_analyze(file_path, jd_text).await {
            Ok(result) => AnalysisResponse::Complete(Box::new(result)),
            Err(e) => AnalysisResponse::Failed {
                error: e.to_string(),
            },
        }
    }

    /// Same as [`Analyzer::analyze`] but keeps the typed error.
    pub async fn try_analyze(
        &self,
        file_path: &Path,
        jd_text: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        let outcome = self.run(file_path, jd_text).await;
        match &outcome {
            Ok(result) => {
                info!(
                    "Analysis complete: {}% match in {}ms",
                    result.matching_score.percentage,
                    started.elapsed().as_millis()
                );
                debug!("Radar scores: {}", radar_summary(result));
            }
            Err(e) => warn!("Analysis failed after {}ms: {e}", started.elapsed().as_millis()),
        }
        outcome
    }

    async fn run(&self, file_path: &Path, jd_text: &str) -> Result<AnalysisResult, AnalysisError> {
        // Step 0: no credential means no point parsing or embedding anything
        self.llm.ensure_ready()?;

        // Step 1: Extract
        let document = self.extract(file_path).await?;
        info!(
            "Extracted {} chars from {} page(s)",
            document.text.chars().count(),
            document.page_count
        );

        // Step 2: Sanitize both texts before they get anywhere near the template
        let cv_text = sanitize(&document.text).into_owned();
        let jd_text = sanitize(jd_text).into_owned();
        drop(document);

        // Step 3: Chunk, index, retrieve, release
        let context = self.retrieve(cv_text, jd_text.clone()).await?;

        // Step 4: Prompt
        let prompt = assemble_prompt(self.renderer.as_ref(), &context, &jd_text)?;

        // Step 5: LLM
        info!("Requesting analysis from {}", self.llm.model_name());
        let raw = self.llm.generate(&prompt).await?;

        // Step 6: Repair and parse
        let result = parse_model_output::<AnalysisResult>(&raw).map_err(|e| {
            debug!("Unparseable model output: {raw}");
            AnalysisError::from(e)
        })?;
        Ok(result)
    }

    async fn extract(&self, file_path: &Path) -> Result<ResumeDocument, AnalysisError> {
        let extractor = Arc::clone(&self.extractor);
        let path = file_path.to_path_buf();
        let document =
            tokio::task::spawn_blocking(move || extract_document(extractor.as_ref(), &path))
                .await??;
        Ok(document)
    }

    /// Returns the top-k chunk texts, nearest first. The collection never
    /// outlives this call.
    async fn retrieve(&self, cv_text: String, jd_text: String) -> Result<Vec<String>, AnalysisError> {
        let store = Arc::clone(&self.store);
        let AnalyzerSettings { chunking, top_k } = self.settings;

        let hits = tokio::task::spawn_blocking(move || -> Result<Vec<RetrievedChunk>, EmbeddingError> {
            let chunks: Vec<String> = chunking
                .chunks(&cv_text)
                .map(|chunk| chunk.text.to_string())
                .collect();
            debug!("Split résumé into {} chunks", chunks.len());

            let collection = store.index(&chunks)?;
            debug!("Querying collection {} for top {top_k}", collection.name());
            let hits = collection.query(&jd_text, top_k)?;
            collection.release();
            Ok(hits)
        })
        .await??;

        debug!(
            "Retrieved {} chunks (nearest distance {:?})",
            hits.len(),
            hits.first().map(|h| h.distance)
        );
        Ok(hits.into_iter().map(|hit| hit.text).collect())
    }
}

fn radar_summary(result: &AnalysisResult) -> String {
    RADAR_DIMENSIONS
        .iter()
        .zip(result.radar_chart.iter())
        .map(|(name, score)| format!("{name}={}", score.value()))
        .collect::<Vec<_>>()
        .join(", ")
}
