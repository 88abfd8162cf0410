// file: src/embedding/hashing.rs
// description: lexical fallback embedding via feature-hashed bag of words
// reference: hashing trick for text vectorization

use crate::embedding::Embedder;
use crate::error::Result;
use crate::extractor::patterns::WORD_TOKEN;
use async_trait::async_trait;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Lexical fallback for hosts that cannot run the local model, and the
/// deterministic embedder used in tests. It only sees shared words, so it
/// does not rank paraphrases semantically.
///
/// Every lower-cased word every lower-cased word
/// token is hashed into one of `dimensions` buckets with a hash-derived sign,
/// and the result is L2-normalised. Needs no network and is fully
/// deterministic, which makes ranking reproducible in tests.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in WORD_TOKEN.find_iter(text) {
            let hash = fnv1a(token.as_str().to_lowercase().as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[test]
    fn test_embedding_dimension_and_norm() {
        let embedder = HashingEmbedder::new(64);
        let vector = embedder.embed_sync("Revenue grew in the third quarter");
        assert_eq!(vector.len(), 64);

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_embedding_deterministic_and_case_insensitive() {
        let embedder = HashingEmbedder::new(128);
        assert_eq!(embedder.embed_sync("Same Text"), embedder.embed_sync("same text"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        assert!(embedder.embed_sync("?!").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_overlapping_words_score_higher() {
        let embedder = HashingEmbedder::new(384);
        let question = embedder.embed_sync("What is artificial intelligence?");
        let related = embedder.embed_sync("Artificial intelligence simulates human intelligence.");
        let unrelated = embedder.embed_sync("The harbour froze during winter storms.");

        let related_score = cosine_similarity(&question, &related).unwrap();
        let unrelated_score = cosine_similarity(&question, &unrelated).unwrap();
        assert!(related_score > unrelated_score);
    }

    #[tokio::test]
    async fn test_embed_batch_matches_single() {
        let embedder = HashingEmbedder::new(32);
        let batch = embedder.embed_batch(&["alpha", "beta"]).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("alpha").await.unwrap());
        assert_eq!(batch[1], embedder.embed("beta").await.unwrap());
    }
}
