// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod answer;
pub mod chunk;
pub mod document;
pub mod keywords;

pub use answer::{Answer, AnswerSheet, QuestionResult};
pub use chunk::RankedChunk;
pub use document::DocumentText;
pub use keywords::KeywordSet;
