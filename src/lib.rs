// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod embedding;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod generation;
pub mod models;
pub mod pipeline;
pub mod retrieval;
pub mod utils;

pub use config::{
    Config, EmbeddingConfig, EmbeddingProvider, GenerationConfig, KeywordConfig, OutputConfig,
    RetrievalConfig,
};
pub use embedding::{Embedder, FastEmbedder, HashingEmbedder, OpenAiEmbedder, cosine_similarity};
pub use error::{QaError, Result};
pub use exporter::{ExportManifest, JsonExporter};
pub use extractor::{KeywordExtractor, StopWords, TextExtractor};
pub use generation::{
    AnswerGenerator, GenerationParams, OpenAiCompatibleGenerator, Prompt, PromptTemplate,
    TextGenerator,
};
pub use models::{Answer, AnswerSheet, DocumentText, KeywordSet, QuestionResult, RankedChunk};
pub use pipeline::{
    BatchReport, DocumentSummary, PipelineStats, ProgressTracker, QaPipeline, parse_questions,
};
pub use retrieval::ChunkRanker;
pub use utils::{OperationTimer, PerformanceMetrics, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _config = Config::default_config();
        let _template = PromptTemplate::new();
        let _extractor = KeywordExtractor::default();
    }
}
