use thiserror::Error;

use crate::analysis::extractor::ExtractError;
use crate::analysis::repair::RepairError;
use crate::analysis::template::TemplateError;
use crate::embedding::EmbeddingError;
use crate::llm_client::LlmError;

/// Every way an analysis run can fail. The display text is what the caller
/// sees in `{"error": ...}`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unreadable PDF content: {0}")]
    UnreadablePdf(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Prompt template error: {0}")]
    Template(#[from] TemplateError),

    #[error("AI service unavailable: {0}")]
    LlmUnavailable(String),

    #[error("AI service timed out after {secs}s, please retry")]
    Timeout { secs: u64 },

    #[error("AI returned invalid format, please retry")]
    MalformedModelOutput(#[source] RepairError),

    #[error("System error: {0}")]
    System(String),
}

impl From<ExtractError> for AnalysisError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Unreadable(reason) => AnalysisError::UnreadablePdf(reason),
            io @ ExtractError::Io { .. } => AnalysisError::System(io.to_string()),
        }
    }
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout { secs } => AnalysisError::Timeout { secs },
            other => AnalysisError::LlmUnavailable(other.to_string()),
        }
    }
}

impl From<RepairError> for AnalysisError {
    fn from(e: RepairError) -> Self {
        AnalysisError::MalformedModelOutput(e)
    }
}

impl From<tokio::task::JoinError> for AnalysisError {
    fn from(e: tokio::task::JoinError) -> Self {
        AnalysisError::System(format!("background task failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_message_mentions_unreadable() {
        let err = AnalysisError::from(ExtractError::Unreadable("no text".to_string()));
        assert!(err.to_string().to_lowercase().contains("unreadable"));
    }

    #[test]
    fn test_llm_timeout_maps_to_timeout() {
        let err = AnalysisError::from(LlmError::Timeout { secs: 120 });
        assert!(matches!(err, AnalysisError::Timeout { secs: 120 }));
    }

    #[test]
    fn test_missing_key_maps_to_unavailable() {
        let err = AnalysisError::from(LlmError::MissingApiKey);
        assert!(matches!(err, AnalysisError::LlmUnavailable(_)));
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_malformed_output_message_is_retryable() {
        let err = AnalysisError::from(RepairError::NoJsonObject);
        assert_eq!(err.to_string(), "AI returned invalid format, please retry");
    }
}
