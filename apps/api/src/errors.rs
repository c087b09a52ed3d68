use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::analysis::error::AnalysisError;
use crate::analysis::result::AnalysisResponse;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders the same single-key body: `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Analysis(e) => match e {
                AnalysisError::UnreadablePdf(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AnalysisError::LlmUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                AnalysisError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                AnalysisError::MalformedModelOutput(_) => StatusCode::BAD_GATEWAY,
                AnalysisError::Embedding(_)
                | AnalysisError::Template(_)
                | AnalysisError::System(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Analysis(e) => {
                if status.is_server_error() {
                    tracing::error!("Analysis error: {e}");
                }
                e.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        (status, Json(AnalysisResponse::Failed { error: message })).into_response()
    }
}
