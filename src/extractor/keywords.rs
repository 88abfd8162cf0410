// file: src/extractor/keywords.rs
// description: keyword extraction from questions via tokenization and stop-word removal
// reference: NLTK word_tokenize + stopwords filtering

use crate::error::{QaError, Result};
use crate::extractor::patterns::{APOSTROPHE, WORD_TOKEN};
use crate::extractor::stopwords::StopWords;
use crate::models::KeywordSet;
use std::collections::HashSet;
use tracing::debug;

pub struct KeywordExtractor {
    stop_words: StopWords,
}

impl KeywordExtractor {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    /// Union of the non-stop-word tokens of every question.
    ///
    /// Fails with `InvalidInput` when the list is empty, a question is blank,
    /// or nothing but stop words remain.
    pub fn extract<S: AsRef<str>>(&self, questions: &[S]) -> Result<KeywordSet> {
        if questions.is_empty() {
            return Err(QaError::InvalidInput(
                "Questions cannot be empty".to_string(),
            ));
        }

        let mut keywords = HashSet::new();

        for question in questions {
            let question = question.as_ref();
            if question.trim().is_empty() {
                return Err(QaError::InvalidInput(
                    "Question cannot be empty".to_string(),
                ));
            }

            debug!("Extracting keywords from question: {}", question);
            keywords.extend(self.question_keywords(question));
        }

        if keywords.is_empty() {
            return Err(QaError::InvalidInput(
                "Questions contain only stop words; no keywords to search for".to_string(),
            ));
        }

        debug!("Extracted {} keywords", keywords.len());
        KeywordSet::new(keywords)
    }

    fn question_keywords(&self, question: &str) -> Vec<String> {
        let mut kept = Vec::new();

        for token in WORD_TOKEN.find_iter(question).map(|m| m.as_str()) {
            if self.stop_words.contains(token) {
                continue;
            }

            // "company's" keeps "company"; "What's" drops entirely
            if APOSTROPHE.is_match(token) {
                kept.extend(
                    APOSTROPHE
                        .split(token)
                        .filter(|part| !part.is_empty() && !self.stop_words.contains(part))
                        .map(str::to_string),
                );
            } else {
                kept.push(token.to_string());
            }
        }

        kept
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(StopWords::english())
    }
}
