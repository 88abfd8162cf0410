// file: src/models/keywords.rs
// description: non-empty keyword set shared read-only across a question batch
// reference: internal data structures

use crate::error::{QaError, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Keywords as extracted (case preserved), plus their lower-cased forms for
/// case-insensitive matching. Never empty.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordSet {
    terms: HashSet<String>,
    #[serde(skip)]
    lowered: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: HashSet<String> = terms
            .into_iter()
            .map(Into::into)
            .filter(|term| !term.trim().is_empty())
            .collect();

        if terms.is_empty() {
            return Err(QaError::InvalidInput(
                "keyword set cannot be empty".to_string(),
            ));
        }

        let mut lowered: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();
        lowered.sort();
        lowered.dedup();

        Ok(Self { terms, lowered })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Terms in a stable, sorted order for display.
    pub fn sorted(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.iter().collect();
        terms.sort_unstable();
        terms
    }

    /// Substring match of any keyword, ignoring case. `"AI"` matches `"said"`.
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.lowered.iter().any(|kw| haystack.contains(kw.as_str()))
    }
}
