// file: src/extractor/mod.rs
// description: text and keyword extraction module exports
// reference: internal module structure

pub mod keywords;
pub mod patterns;
pub mod pdf;
pub mod stopwords;

pub use keywords::KeywordExtractor;
pub use pdf::TextExtractor;
pub use stopwords::StopWords;
