// file: src/retrieval/ranker.rs
// description: semantic re-ranking of candidate chunks against a question
// reference: embedding cosine similarity, stable top-k selection

use crate::config::RetrievalConfig;
use crate::embedding::{Embedder, cosine_similarities};
use crate::error::{QaError, Result};
use crate::models::{KeywordSet, RankedChunk};
use crate::retrieval::chunker::candidate_chunks;
use std::sync::Arc;
use tracing::{debug, warn};

/// Chunker/Ranker: turns document text into the few chunks most similar to a
/// question.
pub struct ChunkRanker {
    embedder: Arc<dyn Embedder>,
    config: RetrievalConfig,
}

impl ChunkRanker {
    pub fn new(embedder: Arc<dyn Embedder>, config: RetrievalConfig) -> Self {
        Self { embedder, config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Top `top_k` chunks by descending similarity to `question`.
    ///
    /// `Err(NoContent)` when no non-blank chunk can be formed. An empty `Vec`
    /// means ranking itself failed and no answer can be derived.
    pub async fn chunk_and_rank(
        &self,
        text: &str,
        keywords: &KeywordSet,
        question: &str,
    ) -> Result<Vec<RankedChunk>> {
        self.chunk_and_rank_with(text, keywords, question, self.config.max_tokens)
            .await
    }

    /// Same as [`chunk_and_rank`](Self::chunk_and_rank) with an explicit word
    /// budget in place of the configured `max_tokens`.
    pub async fn chunk_and_rank_with(
        &self,
        text: &str,
        keywords: &KeywordSet,
        question: &str,
        max_tokens: usize,
    ) -> Result<Vec<RankedChunk>> {
        let config = self.config.with_max_tokens(max_tokens);
        config.validate()?;

        let chunks = candidate_chunks(text, keywords, &config)?;
        debug!("{} chunks generated", chunks.len());

        Ok(self.rank(question, chunks).await)
    }

    /// Re-ranks `chunks`; any embedding or numeric failure is logged and
    /// yields an empty list.
    pub async fn rank(&self, question: &str, chunks: Vec<String>) -> Vec<RankedChunk> {
        match self.try_rank(question, chunks).await {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!("Error during semantic similarity computation: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_rank(&self, question: &str, chunks: Vec<String>) -> Result<Vec<RankedChunk>> {
        let question_embedding = self.embedder.embed(question).await?;

        let chunk_refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let chunk_embeddings = self.embedder.embed_batch(&chunk_refs).await?;
        if chunk_embeddings.len() != chunks.len() {
            return Err(QaError::Embedding(format!(
                "{} embeddings returned for {} chunks",
                chunk_embeddings.len(),
                chunks.len()
            )));
        }

        debug!("Question embedding: {} dimensions", question_embedding.len());
        let similarities = cosine_similarities(&question_embedding, &chunk_embeddings)?;
        debug!("Similarities: {:?}", similarities);

        let mut scored: Vec<RankedChunk> = chunks
            .into_iter()
            .zip(similarities)
            .map(|(text, similarity)| RankedChunk::new(text, similarity))
            .collect();

        // stable: equal scores keep document order
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(self.config.top_k);

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(QaError::Embedding("model failed to load".to_string()))
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Every text maps to the same vector, so all similarities tie.
    struct ConstantEmbedder;

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 1.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    /// Returns NaN components, a numeric failure.
    struct NanEmbedder;

    #[async_trait]
    impl Embedder for NanEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![f32::NAN, 1.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "nan"
        }
    }

    fn ranker(embedder: Arc<dyn Embedder>) -> ChunkRanker {
        ChunkRanker::new(embedder, RetrievalConfig::default())
    }

    fn keywords(terms: &[&str]) -> KeywordSet {
        KeywordSet::new(terms.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn test_single_eligible_sentence() {
        let ranker = ranker(Arc::new(HashingEmbedder::new(384)));
        let text = "The cat sat. The dog ran. AI is transformative. ";

        let chunks = ranker
            .chunk_and_rank(text, &keywords(&["AI"]), "What is AI?")
            .await
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "AI is transformative.");
    }

    #[tokio::test]
    async fn test_most_similar_chunk_first() {
        let ranker = ranker(Arc::new(HashingEmbedder::new(384)));
        let text = "Quarterly revenue reached four million dollars. \
                    The office dog is named Revenue Rex";

        // budget 3 words forces one chunk per sentence
        let chunks = ranker
            .chunk_and_rank_with(
                text,
                &keywords(&["revenue"]),
                "What was quarterly revenue in dollars?",
                4,
            )
            .await
            .unwrap();

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.starts_with("Quarterly revenue"));
        assert!(chunks[0].similarity >= chunks[1].similarity);
    }

    #[tokio::test]
    async fn test_top_k_cap() {
        let ranker = ranker(Arc::new(HashingEmbedder::new(384)));
        let text = (0..10)
            .map(|i| format!("alpha item {} has details", i))
            .collect::<Vec<_>>()
            .join(". ");

        let chunks = ranker
            .chunk_and_rank_with(&text, &keywords(&["alpha"]), "alpha details", 2)
            .await
            .unwrap();

        assert_eq!(chunks.len(), 3);
    }

    #[tokio::test]
    async fn test_ties_keep_document_order() {
        let ranker = ranker(Arc::new(ConstantEmbedder));
        let chunks = vec![
            "first".to_string(),
            "second".to_string(),
            "third".to_string(),
            "fourth".to_string(),
        ];

        let ranked = ranker.rank("anything", chunks).await;
        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_embedding_failure_returns_empty() {
        let ranker = ranker(Arc::new(FailingEmbedder));
        let chunks = ranker
            .chunk_and_rank("AI is here. ", &keywords(&["AI"]), "What is AI?")
            .await
            .unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_numeric_failure_returns_empty() {
        let ranker = ranker(Arc::new(NanEmbedder));
        let ranked = ranker.rank("q", vec!["chunk".to_string()]).await;
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_no_content_is_error() {
        let ranker = ranker(Arc::new(HashingEmbedder::new(384)));
        let result = ranker
            .chunk_and_rank("   ", &keywords(&["AI"]), "What is AI?")
            .await;
        assert!(matches!(result, Err(QaError::NoContent)));
    }

    #[tokio::test]
    async fn test_invalid_budget_rejected() {
        let ranker = ranker(Arc::new(HashingEmbedder::new(384)));
        let result = ranker
            .chunk_and_rank_with("AI. ", &keywords(&["AI"]), "What is AI?", 0)
            .await;
        assert!(matches!(result, Err(QaError::Config(_))));
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let ranker = ranker(Arc::new(HashingEmbedder::new(64)));
        let text = "alpha one. alpha two. beta alpha three. alpha four";
        let keywords = keywords(&["alpha"]);

        let first = tokio_test::block_on(ranker.chunk_and_rank_with(
            text,
            &keywords,
            "alpha three",
            2,
        ))
        .unwrap();
        let second = tokio_test::block_on(ranker.chunk_and_rank_with(
            text,
            &keywords,
            "alpha three",
            2,
        ))
        .unwrap();

        assert_eq!(first, second);
    }
}
