// file: src/retrieval/mod.rs
// description: chunking and semantic re-ranking module exports
// reference: internal module structure

pub mod chunker;
pub mod ranker;

pub use chunker::{SENTENCE_DELIMITER, candidate_chunks, fixed_windows, group_by_keywords};
pub use ranker::ChunkRanker;
