//! LLM client: the single point of entry for all Gemini API calls in JobMatch.
//!
//! No other module may call the Gemini API directly; the pipeline only sees the
//! [`LanguageModel`] trait, so tests can substitute a scripted model.
//!
//! Sampling temperature is fixed at 0.2 for consistent, schema-compliant output,
//! and every safety category is set to `BLOCK_NONE` so personal résumé content
//! is never spuriously blocked.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::JSON_ONLY_SYSTEM;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";
pub const TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Upper bound on `max_retries`; the backoff doubles per attempt.
pub const MAX_RETRIES_LIMIT: u32 = 10;

const HARM_CATEGORIES: [&str; 5] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_CIVIC_INTEGRITY",
];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GOOGLE_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response blocked by the provider: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Text-in, text-out generative model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Fails fast, without any network traffic, when the model cannot be called at all.
    fn ensure_ready(&self) -> Result<(), LlmError> {
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (generateContent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<Usage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    /// Concatenated text of the first candidate, or why there is none.
    pub fn text(&self) -> Result<String, LlmError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(LlmError::Blocked(reason.to_string()));
        }

        let candidate = self.candidates.first().ok_or(LlmError::EmptyContent)?;
        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return Err(match candidate.finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                    LlmError::Blocked(reason.to_string())
                }
                _ => LlmError::EmptyContent,
            });
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub model: String,
    /// Models collection URL; the model id and `:generateContent` are appended.
    pub base_url: String,
    pub timeout: Duration,
    /// Extra attempts after the first on transport errors, 429 and 5xx.
    pub max_retries: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: 0,
        }
    }
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    settings: LlmSettings,
}

impl GeminiClient {
    /// A missing key is accepted here; every call then fails with [`LlmError::MissingApiKey`].
    pub fn new(api_key: Option<String>, settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            settings,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on 429, 5xx and transport errors with exponential backoff when
    /// `max_retries` allows it.
    pub async fn call(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![RequestPart {
                    text: JSON_ONLY_SYSTEM,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
            safety_settings: relaxed_safety_settings(),
        };

        let mut attempt: u32 = 0;
        loop {
            match self.send_once(api_key, &request_body).await {
                Err(e) if attempt < self.settings.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    // Exponential backoff: 1s, 2s, 4s
                    let delay = Duration::from_millis(1000 * (1_u64 << (attempt - 1).min(5)));
                    warn!(
                        "LLM call attempt {} failed ({e}), retrying after {}ms...",
                        attempt,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
        }
    }

    async fn send_once(
        &self,
        api_key: &str,
        request_body: &GenerateContentRequest<'_>,
    ) -> Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(request_body)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 || status.is_server_error() {
                warn!("LLM API returned {}: {}", status, body);
            }
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response
            .json()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }

    fn classify_transport_error(&self, error: reqwest::Error) -> LlmError {
        if error.is_timeout() {
            LlmError::Timeout {
                secs: self.settings.timeout.as_secs(),
            }
        } else {
            LlmError::Http(error)
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.settings.model
    }

    fn ensure_ready(&self) -> Result<(), LlmError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(LlmError::MissingApiKey)
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.call(prompt).await?.text()
    }
}

/// Transport failures, timeouts, 429 and 5xx are worth another attempt; other
/// API errors are not.
fn is_retryable(error: &LlmError) -> bool {
    match error {
        LlmError::Http(_) | LlmError::Timeout { .. } => true,
        LlmError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

fn relaxed_safety_settings() -> Vec<SafetySetting> {
    HARM_CATEGORIES
        .iter()
        .map(|&category| SafetySetting {
            category,
            threshold: "BLOCK_NONE",
        })
        .collect()
}
