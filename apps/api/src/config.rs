use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::analysis::chunker::ChunkConfig;
use crate::analysis::pipeline::AnalyzerSettings;
use crate::embedding::store::DEFAULT_TOP_K;
use crate::llm_client::{LlmSettings, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, MAX_RETRIES_LIMIT};

/// Application configuration loaded from environment variables.
/// Only malformed values are fatal; every variable has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent key is allowed: the service starts and analyses report the missing credential.
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_top_k: usize,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub embedding_cache_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            google_api_key: get("GOOGLE_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port: parse_or(&get, "PORT", 8000)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            chunk_size: parse_or(&get, "CHUNK_SIZE", 1000)?,
            chunk_overlap: parse_or(&get, "CHUNK_OVERLAP", 200)?,
            retrieval_top_k: parse_or(&get, "RETRIEVAL_TOP_K", DEFAULT_TOP_K)?,
            llm_timeout_secs: parse_or(&get, "LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            llm_max_retries: parse_or(&get, "LLM_MAX_RETRIES", 0)?,
            embedding_cache_dir: get("EMBEDDING_CACHE_DIR").map(PathBuf::from),
        };

        if config.retrieval_top_k == 0 {
            bail!("RETRIEVAL_TOP_K must be at least 1");
        }
        if config.llm_timeout_secs == 0 {
            bail!("LLM_TIMEOUT_SECS must be at least 1");
        }
        if config.llm_max_retries > MAX_RETRIES_LIMIT {
            bail!("LLM_MAX_RETRIES must be at most {MAX_RETRIES_LIMIT}");
        }
        config.analyzer_settings()?;

        Ok(config)
    }

    pub fn analyzer_settings(&self) -> Result<AnalyzerSettings> {
        let chunking = ChunkConfig::new(self.chunk_size, self.chunk_overlap)
            .context("Invalid CHUNK_SIZE / CHUNK_OVERLAP")?;
        Ok(AnalyzerSettings {
            chunking,
            top_k: self.retrieval_top_k,
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            model: self.gemini_model.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
            max_retries: self.llm_max_retries,
            ..LlmSettings::default()
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
