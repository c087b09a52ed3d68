//! Ephemeral in-memory vector store.
//!
//! Every analysis request indexes its résumé chunks into its own uniquely
//! named collection, queries it once and drops it. [`Collection`] is a scope
//! guard: the collection is removed from the store when the guard is released
//! or dropped, including on early returns and `?` paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::{Embedder, Embedding, EmbeddingError};

/// Number of chunks retrieved per query unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 5;

struct IndexedChunk {
    text: String,
    vector: Embedding,
}

/// A chunk returned by a query, with its cosine distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub distance: f32,
}

/// Registry of live per-request collections sharing one embedding model.
pub struct VectorStore {
    embedder: Arc<dyn Embedder>,
    collections: Mutex<HashMap<String, Arc<[IndexedChunk]>>>,
}

impl VectorStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            collections: Mutex::new(HashMap::new()),
        }
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Embeds `chunks` and stores them under a fresh collection name.
    ///
    /// Nothing is registered when embedding fails.
    pub fn index(&self, chunks: &[String]) -> Result<Collection<'_>, EmbeddingError> {
        let vectors = self.embedder.embed_documents(chunks)?;
        if vectors.len() != chunks.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: chunks.len(),
                got: vectors.len(),
            });
        }

        let entries: Arc<[IndexedChunk]> = chunks
            .iter()
            .cloned()
            .zip(vectors)
            .map(|(text, vector)| IndexedChunk { text, vector })
            .collect();

        let name = new_collection_name();
        self.lock().insert(name.clone(), entries);
        debug!("Indexed {} chunks into collection {name}", chunks.len());

        Ok(Collection { store: self, name })
    }

    /// Number of collections currently held.
    pub fn collection_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<[IndexedChunk]>>> {
        // The map stays consistent even if a holder panicked: every mutation is a single insert/remove.
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn nearest(&self, name: &str, query: &[f32], k: usize) -> Vec<RetrievedChunk> {
        // Scoring runs outside the registry lock so concurrent requests don't queue.
        let Some(entries) = self.lock().get(name).cloned() else {
            return Vec::new();
        };

        let mut scored: Vec<(f32, &IndexedChunk)> = entries
            .iter()
            .map(|entry| (cosine_distance(query, &entry.vector), entry))
            .collect();
        // Stable sort: equal distances keep indexing order.
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        scored
            .into_iter()
            .take(k)
            .map(|(distance, entry)| RetrievedChunk {
                text: entry.text.clone(),
                distance,
            })
            .collect()
    }

    fn remove(&self, name: &str) {
        if self.lock().remove(name).is_some() {
            debug!("Released collection {name}");
        }
    }
}

/// Handle to one request's collection. Dropping it releases the collection.
pub struct Collection<'s> {
    store: &'s VectorStore,
    name: String,
}

impl Collection<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `k` chunks nearest to `query_text`, nearest first.
    pub fn query(&self, query_text: &str, k: usize) -> Result<Vec<RetrievedChunk>, EmbeddingError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query = self.store.embedder.embed_query(query_text)?;
        Ok(self.store.nearest(&self.name, &query, k))
    }

    /// Discards the collection now rather than at end of scope.
    pub fn release(self) {}
}

impl Drop for Collection<'_> {
    fn drop(&mut self) {
        self.store.remove(&self.name);
    }
}

fn new_collection_name() -> String {
    format!(
        "cv_analysis_{}_{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

/// 1 - cosine similarity. Zero vectors are maximally distant from everything;
/// non-finite input ranks behind every real distance.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    let distance = 1.0 - dot / (norm_a * norm_b);
    if distance.is_finite() {
        distance
    } else {
        f32::INFINITY
    }
}
