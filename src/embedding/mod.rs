// file: src/embedding/mod.rs
// description: embedding model abstraction and cosine similarity
// reference: sentence-embedding encode / cos_sim contract

pub mod hashing;
pub mod local;
pub mod openai;

use crate::config::{EmbeddingConfig, EmbeddingProvider};
use crate::error::{QaError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub use hashing::HashingEmbedder;
pub use local::FastEmbedder;
pub use openai::OpenAiEmbedder;

/// A model mapping text to fixed-dimension vectors.
///
/// Built once per process and shared read-only; question and chunks of one
/// ranking call must go through the same instance.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds each input in order. The default calls [`embed`](Embedder::embed)
    /// sequentially; backends with native batching override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;
}

/// Builds the embedder selected by `config.provider`.
pub fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider {
        EmbeddingProvider::FastEmbed => Ok(Arc::new(FastEmbedder::from_config(config)?)),
        EmbeddingProvider::Hashing => Ok(Arc::new(HashingEmbedder::new(config.dimensions))),
        EmbeddingProvider::OpenAi => Ok(Arc::new(OpenAiEmbedder::from_config(config)?)),
    }
}

/// Cosine similarity of two vectors of equal length.
///
/// Zero-magnitude vectors score 0.0. Mismatched lengths and non-finite results
/// are errors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(QaError::Embedding(format!(
            "dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if !(dot.is_finite() && norm_a.is_finite() && norm_b.is_finite()) {
        return Err(QaError::Embedding(
            "non-finite value in embedding".to_string(),
        ));
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Similarity of `query` against each candidate, in candidate order.
pub fn cosine_similarities(query: &[f32], candidates: &[Vec<f32>]) -> Result<Vec<f32>> {
    candidates
        .iter()
        .map(|candidate| cosine_similarity(query, candidate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_basic() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_rejects_mismatch_and_nan() {
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_err());
        assert!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 0.0]).is_err());
        assert!(cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_cosine_similarities_keeps_order() {
        let scores =
            cosine_similarities(&[1.0, 0.0], &[vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]])
                .unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores[0].abs() < 1e-6);
        assert!((scores[1] - 1.0).abs() < 1e-6);
        assert!((scores[2] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_from_config_builds_hashing_embedder() {
        let mut config = crate::config::Config::default_config().embedding;
        config.provider = EmbeddingProvider::Hashing;
        let embedder = from_config(&config).unwrap();
        assert_eq!(embedder.name(), "hashing");
        assert_eq!(embedder.dimensions(), 384);
    }
}
