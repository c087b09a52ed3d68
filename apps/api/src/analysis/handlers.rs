use std::io::Write;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use tempfile::NamedTempFile;
use tracing::info;

use crate::analysis::result::AnalysisResponse;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/analyze
///
/// Multipart parts: `file` (the résumé PDF) and `jd_text`. The upload lives in
/// a temp file that is deleted when this handler returns.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut upload: Option<NamedTempFile> = None;
    let mut jd_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload.pdf").to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?;
                if bytes.is_empty() {
                    return Err(AppError::Validation("Uploaded file is empty".to_string()));
                }
                info!("Received {file_name} ({} bytes)", bytes.len());
                let file = tokio::task::spawn_blocking(move || write_upload(&bytes))
                    .await
                    .context("Upload writer task failed")??;
                upload = Some(file);
            }
            Some("jd_text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read jd_text: {e}")))?;
                jd_text = Some(text);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    let jd_text = jd_text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jd_text is required".to_string()))?;

    let result = state.analyzer.try_analyze(upload.path(), &jd_text).await?;
    Ok(Json(AnalysisResponse::Complete(Box::new(result))))
}

fn write_upload(bytes: &[u8]) -> Result<NamedTempFile, AppError> {
    let mut file = tempfile::Builder::new()
        .prefix("cv_upload_")
        .suffix(".pdf")
        .tempfile()
        .context("Failed to create temp file for upload")?;
    file.write_all(bytes)
        .context("Failed to write upload to temp file")?;
    Ok(file)
}
