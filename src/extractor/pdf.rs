// file: src/extractor/pdf.rs
// description: PDF to plain text extraction, pages concatenated in order
// reference: https://docs.rs/pdf-extract

use crate::error::{QaError, Result};
use crate::models::DocumentText;
use crate::utils::Validator;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_file(&self, path: &Path) -> Result<DocumentText> {
        Validator::validate_file_path(path)
            .and_then(|_| Validator::validate_pdf_extension(path))
            .map_err(|e| QaError::extraction(path, e.to_string()))?;

        info!("Extracting text from {}", path.display());

        let pages = guard_parser(path, || pdf_extract::extract_text_by_pages(path))?;

        Self::join_pages(path, pages)
    }

    pub fn extract_bytes(&self, source: &Path, bytes: &[u8]) -> Result<DocumentText> {
        debug!("Extracting text from {} in-memory bytes", bytes.len());

        let pages = guard_parser(source, || pdf_extract::extract_text_from_mem_by_pages(bytes))?;

        Self::join_pages(source, pages)
    }

    // Pages are concatenated without a separator.
    fn join_pages(source: &Path, pages: Vec<String>) -> Result<DocumentText> {
        let page_count = pages.len();
        let text = pages.concat();

        if text.trim().is_empty() {
            return Err(QaError::extraction(
                source,
                format!("no extractable text in {} page(s)", page_count),
            ));
        }

        debug!(
            "Extracted {} chars from {} page(s)",
            text.chars().count(),
            page_count
        );

        Ok(DocumentText::new(source, text, page_count))
    }
}

/// Runs a pdf-extract call, turning both its errors and its panics on
/// malformed documents into `Extraction` errors.
fn guard_parser<F>(source: &Path, parse: F) -> Result<Vec<String>>
where
    F: FnOnce() -> std::result::Result<Vec<String>, pdf_extract::OutputError>,
{
    match panic::catch_unwind(AssertUnwindSafe(parse)) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(QaError::extraction(source, e.to_string())),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("PDF parser panicked on {}: {}", source.display(), message);
            Err(QaError::extraction(
                source,
                format!("PDF parser panicked: {}", message),
            ))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}
