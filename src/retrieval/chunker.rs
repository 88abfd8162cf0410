// file: src/retrieval/chunker.rs
// description: keyword-gated sentence grouping with fixed-window fallback
// reference: bounded chunking ahead of semantic re-ranking

use crate::config::RetrievalConfig;
use crate::error::{QaError, Result};
use crate::models::KeywordSet;
use tracing::{debug, info};

/// Literal sentence delimiter. Not a linguistic sentence boundary detector.
pub const SENTENCE_DELIMITER: &str = ". ";

/// Candidate chunks for ranking: keyword groups, else fixed windows, with
/// blank chunks removed. Fails with `NoContent` when nothing is left.
pub fn candidate_chunks(
    text: &str,
    keywords: &KeywordSet,
    config: &RetrievalConfig,
) -> Result<Vec<String>> {
    let mut chunks = group_by_keywords(text, keywords, config.word_budget());

    if chunks.is_empty() {
        info!("No chunks matched keywords; splitting text into general chunks");
        chunks = fixed_windows(text, config.window_chars());
    }

    chunks.retain(|chunk| !chunk.trim().is_empty());

    if chunks.is_empty() {
        return Err(QaError::NoContent);
    }

    debug!("Produced {} candidate chunk(s)", chunks.len());
    Ok(chunks)
}

/// Groups keyword-bearing sentences in document order into chunks whose word
/// count stays within `word_budget` where possible.
///
/// A sentence that alone exceeds the budget still becomes its own chunk; the
/// closed buffer in front of it may then be empty, which cleanup removes.
pub fn group_by_keywords(text: &str, keywords: &KeywordSet, word_budget: f64) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in text.split(SENTENCE_DELIMITER) {
        if !keywords.matches(sentence) {
            continue;
        }

        let words = current.split_whitespace().count() + sentence.split_whitespace().count();
        if words as f64 > word_budget {
            chunks.push(current.trim().to_string());
            current.clear();
        }

        current.push_str(sentence);
        current.push_str(SENTENCE_DELIMITER);
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}

/// Consecutive windows of `window_chars` characters covering `text` with no
/// overlap and no gaps. Never splits a character.
pub fn fixed_windows(text: &str, window_chars: usize) -> Vec<String> {
    if window_chars == 0 {
        return Vec::new();
    }

    let mut windows = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = text[start..]
            .char_indices()
            .nth(window_chars)
            .map(|(offset, _)| start + offset)
            .unwrap_or(text.len());
        windows.push(text[start..end].to_string());
        start = end;
    }

    windows
}
