pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Largest accepted request body (résumé PDF plus form fields).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::pipeline::tests::{model_answer, FixedPages, ScriptedModel};
    use crate::analysis::pipeline::{Analyzer, AnalyzerSettings};
    use crate::analysis::template::BraceTemplate;
    use crate::embedding::testing::HashingEmbedder;
    use crate::embedding::VectorStore;

    const BOUNDARY: &str = "jobmatch-test-boundary";

    fn app(pages: &[&str], llm: ScriptedModel) -> Router {
        let analyzer = Analyzer::new(
            Arc::new(FixedPages::new(pages)),
            Arc::new(VectorStore::new(Arc::new(HashingEmbedder::default()))),
            Arc::new(llm),
            Arc::new(BraceTemplate),
            AnalyzerSettings::default(),
        );
        let state = AppState {
            analyzer: Arc::new(analyzer),
        };
        build_router(state)
    }

    fn multipart_body(pdf: Option<&[u8]>, jd_text: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(pdf) = pdf {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                     filename=\"resume.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(pdf);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(jd) = jd_text {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"jd_text\"\r\n\r\n{jd}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_analyze(app: Router, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn error_message(body: &Value) -> &str {
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1, "unexpected keys: {body}");
        object["error"].as_str().unwrap()
    }

    const RESUME: &str = "Backend developer. Four years of Rust, PostgreSQL and Docker.";
    const PDF_BYTES: &[u8] = b"%PDF-1.4 placeholder";

    #[tokio::test]
    async fn test_health_reports_models() {
        let app = app(&[RESUME], ScriptedModel::unconfigured());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["embedding_model"], "test/hashing-bow");
        assert_eq!(body["llm_model"], "scripted");
        assert_eq!(body["llm_configured"], false);
        assert_eq!(body["active_collections"], 0);
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let app = app(&[RESUME], ScriptedModel::replying(model_answer()));
        let body = multipart_body(Some(PDF_BYTES), Some("Rust\nPostgreSQL\nKubernetes"));

        let (status, json) = post_analyze(app, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["matching_score"]["percentage"], 80);
        assert_eq!(json["requirements_breakdown"]["must_have_ratio"], "4/5");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_analyze_requires_jd_text() {
        let app = app(&[RESUME], ScriptedModel::replying(model_answer()));
        let (status, json) = post_analyze(app, multipart_body(Some(PDF_BYTES), Some("  "))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&json), "jd_text is required");
    }

    #[tokio::test]
    async fn test_analyze_requires_file() {
        let app = app(&[RESUME], ScriptedModel::replying(model_answer()));
        let (status, json) = post_analyze(app, multipart_body(None, Some("Rust"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&json), "file is required");
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_422() {
        let app = app(&["   "], ScriptedModel::replying(model_answer()));
        let (status, json) = post_analyze(app, multipart_body(Some(PDF_BYTES), Some("Rust"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(error_message(&json).to_lowercase().contains("unreadable"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_503() {
        let app = app(&[RESUME], ScriptedModel::unconfigured());
        let (status, json) = post_analyze(app, multipart_body(Some(PDF_BYTES), Some("Rust"))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(error_message(&json).contains("GOOGLE_API_KEY"));
    }

    #[tokio::test]
    async fn test_malformed_model_output_is_502() {
        let app = app(&[RESUME], ScriptedModel::replying("no json here"));
        let (status, json) = post_analyze(app, multipart_body(Some(PDF_BYTES), Some("Rust"))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            error_message(&json),
            "AI returned invalid format, please retry"
        );
    }
}
