// file: src/models/document.rs
// description: extracted document text with page count and content hash
// reference: internal data structures

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Plain text of a whole PDF, pages concatenated in order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentText {
    pub source: PathBuf,
    pub text: String,
    pub page_count: usize,
    pub content_hash: String,
}

impl DocumentText {
    pub fn new(source: impl Into<PathBuf>, text: String, page_count: usize) -> Self {
        let content_hash = Self::compute_hash(&text);

        Self {
            source: source.into(),
            text,
            page_count,
            content_hash,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = DocumentText::new("report.pdf", "Première page. Second".to_string(), 2);

        assert_eq!(doc.source(), Path::new("report.pdf"));
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.char_count(), 21);
        assert_eq!(doc.word_count(), 3);
        assert_eq!(doc.content_hash.len(), 64);
    }

    #[test]
    fn test_hash_consistency() {
        let hash1 = DocumentText::compute_hash("Test content");
        let hash2 = DocumentText::compute_hash("Test content");
        let hash3 = DocumentText::compute_hash("Other content");
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
    }
}
