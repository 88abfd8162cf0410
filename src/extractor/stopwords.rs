// file: src/extractor/stopwords.rs
// description: English stop-word list, built in or loaded from a file
// reference: NLTK english stop-word corpus

use crate::error::{QaError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

const BUILTIN_ENGLISH: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/resources/stopwords/english.txt"
));

/// Lower-cased stop words. One word per line in the source; blank lines and
/// lines starting with `#` are ignored.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn english() -> Self {
        Self {
            words: parse_word_list(BUILTIN_ENGLISH),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QaError::ResourceUnavailable(format!(
                "Failed to load stop words from {}: {}",
                path.display(),
                e
            ))
        })?;

        let words = parse_word_list(&content);
        if words.is_empty() {
            return Err(QaError::ResourceUnavailable(format!(
                "Stop-word list {} contains no words",
                path.display()
            )));
        }

        debug!("Loaded {} stop words from {}", words.len(), path.display());
        Ok(Self { words })
    }

    /// Built-in list unless a replacement file is configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::english()),
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

fn parse_word_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_list() {
        let stop_words = StopWords::english();
        assert_eq!(stop_words.len(), 179);
        assert!(stop_words.contains("the"));
        assert!(stop_words.contains("What"));
        assert!(stop_words.contains("isn't"));
        assert!(!stop_words.contains("revenue"));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.txt");
        fs::write(&path, "# custom\nFoo\n\n  bar  \n").unwrap();

        let stop_words = StopWords::load(Some(&path)).unwrap();
        assert_eq!(stop_words.len(), 2);
        assert!(stop_words.contains("foo"));
        assert!(stop_words.contains("BAR"));
        assert!(!stop_words.contains("the"));
    }

    #[test]
    fn test_missing_file_is_resource_unavailable() {
        let result = StopWords::from_file(Path::new("/nonexistent/stopwords.txt"));
        assert!(matches!(result, Err(QaError::ResourceUnavailable(_))));
    }

    #[test]
    fn test_empty_file_is_resource_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "# nothing here\n\n").unwrap();

        let result = StopWords::from_file(&path);
        assert!(matches!(result, Err(QaError::ResourceUnavailable(_))));
    }
}
