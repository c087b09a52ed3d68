//! Text extractor. Pulls page text out of an uploaded résumé PDF.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not open résumé file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unreadable PDF: {0}")]
    Unreadable(String),
}

/// Raw résumé text, owned by a single analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    pub text: String,
    pub page_count: usize,
}

/// Source of per-page résumé text. Swappable so the pipeline can run without a PDF parser.
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// Production extractor backed by `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        // The handle is closed when `read` returns, before any parsing starts.
        let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;

        // pdf-extract panics on some malformed inputs instead of returning an error.
        panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| ExtractError::Unreadable("PDF parser aborted on malformed input".to_string()))?
        .map_err(|e| ExtractError::Unreadable(e.to_string()))
    }
}

/// Extracts all pages and joins them with newlines.
///
/// Fails with [`ExtractError::Unreadable`] when no page carries any text, which
/// is what scanned, image-only PDFs without an OCR layer look like.
pub fn extract_document(
    extractor: &dyn TextExtractor,
    path: &Path,
) -> Result<ResumeDocument, ExtractError> {
    let pages = extractor.extract_pages(path)?;
    join_pages(pages).ok_or_else(|| {
        ExtractError::Unreadable(
            "no extractable text (scanned or image-only document?)".to_string(),
        )
    })
}

fn join_pages(pages: Vec<String>) -> Option<ResumeDocument> {
    if pages.iter().all(|page| page.trim().is_empty()) {
        return None;
    }

    Some(ResumeDocument {
        page_count: pages.len(),
        text: pages.join("\n"),
    })
}
