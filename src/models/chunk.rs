// file: src/models/chunk.rs
// description: Ranked chunk model with similarity score
// reference: Used for semantic re-ranking results

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedChunk {
    /// Chunk text, trimmed and never empty
    pub text: String,

    /// Cosine similarity to the question (higher is more similar)
    pub similarity: f32,
}

impl RankedChunk {
    pub fn new(text: String, similarity: f32) -> Self {
        Self { text, similarity }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let preview: String = self.text.chars().take(max_content_len).collect();
        let ellipsis = if preview.len() < self.text.len() { "..." } else { "" };

        format!(
            "Similarity: {:.4} | {} words\n{}{}\n",
            self.similarity,
            self.word_count(),
            preview,
            ellipsis
        )
    }
}
