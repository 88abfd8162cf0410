// file: src/embedding/local.rs
// description: local sentence-transformer embeddings through fastembed
// reference: https://docs.rs/fastembed

use crate::config::EmbeddingConfig;
use crate::embedding::Embedder;
use crate::error::{QaError, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tracing::{debug, info};

/// Models the local provider knows, by their sentence-transformers names.
const KNOWN_MODELS: &[(&str, usize)] = &[
    ("all-MiniLM-L6-v2", 384),
    ("all-MiniLM-L12-v2", 384),
    ("bge-small-en-v1.5", 384),
];

/// Resolves a configured model name to a fastembed model and its output
/// dimension. Accepts an optional `sentence-transformers/` or `BAAI/` prefix,
/// ignoring case.
pub fn resolve_model(name: &str) -> Option<(EmbeddingModel, usize)> {
    let lowered = name.to_lowercase();
    let short = lowered
        .strip_prefix("sentence-transformers/")
        .or_else(|| lowered.strip_prefix("baai/"))
        .unwrap_or(&lowered);

    let model = match short {
        "all-minilm-l6-v2" => EmbeddingModel::AllMiniLML6V2,
        "all-minilm-l12-v2" => EmbeddingModel::AllMiniLML12V2,
        "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
        _ => return None,
    };

    KNOWN_MODELS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(short))
        .map(|(_, dims)| (model, *dims))
}

/// Sentence embeddings computed in-process. The ONNX model is downloaded
/// into the fastembed cache on first use, then loaded once and shared.
pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
    name: String,
    dimensions: usize,
}

impl FastEmbedder {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let (model_name, dimensions) = check_config(config)?;

        info!("Loading local embedding model {}", config.model);
        let mut options = InitOptions::default();
        options.model_name = model_name;
        options.show_download_progress = false;

        let model = TextEmbedding::try_new(options).map_err(|e| {
            QaError::Embedding(format!(
                "Failed to load embedding model {}: {}",
                config.model, e
            ))
        })?;

        Ok(Self {
            model: Arc::new(model),
            name: config.model.clone(),
            dimensions,
        })
    }

    async fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let expected = texts.len();
        let model = Arc::clone(&self.model);

        debug!("Encoding {} text(s) with {}", expected, self.name);
        let vectors = tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| QaError::Embedding(format!("Embedding task failed: {}", e)))?
            .map_err(|e| QaError::Embedding(format!("Embedding generation failed: {}", e)))?;

        if vectors.len() != expected {
            return Err(QaError::Embedding(format!(
                "Expected {} embeddings, received {}",
                expected,
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

fn check_config(config: &EmbeddingConfig) -> Result<(EmbeddingModel, usize)> {
    let (model, dimensions) = resolve_model(&config.model).ok_or_else(|| {
        let known: Vec<&str> = KNOWN_MODELS.iter().map(|(name, _)| *name).collect();
        QaError::Config(format!(
            "embedding.model '{}' is not a supported local model (expected one of: {})",
            config.model,
            known.join(", ")
        ))
    })?;

    if dimensions != config.dimensions {
        return Err(QaError::Config(format!(
            "embedding.dimensions is {} but {} produces {}",
            config.dimensions, config.model, dimensions
        )));
    }

    Ok((model, dimensions))
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| QaError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.encode(texts.iter().map(|t| t.to_string()).collect()).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::embedding::cosine_similarity;

    #[test]
    fn test_resolve_model_names() {
        assert!(matches!(
            resolve_model("all-MiniLM-L6-v2"),
            Some((EmbeddingModel::AllMiniLML6V2, 384))
        ));
        assert!(matches!(
            resolve_model("sentence-transformers/all-MiniLM-L6-v2"),
            Some((EmbeddingModel::AllMiniLML6V2, 384))
        ));
        assert!(matches!(
            resolve_model("BAAI/bge-small-en-v1.5"),
            Some((EmbeddingModel::BGESmallENV15, 384))
        ));
        assert!(resolve_model("text-embedding-3-small").is_none());
    }

    #[test]
    fn test_default_config_resolves() {
        let config = Config::default_config().embedding;
        let (_, dimensions) = check_config(&config).unwrap();
        assert_eq!(dimensions, config.dimensions);
    }

    #[test]
    fn test_unknown_model_rejected_before_download() {
        let mut config = Config::default_config().embedding;
        config.model = "text-embedding-3-small".to_string();
        assert!(matches!(
            FastEmbedder::from_config(&config),
            Err(QaError::Config(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut config = Config::default_config().embedding;
        config.dimensions = 768;
        assert!(matches!(check_config(&config), Err(QaError::Config(_))));
    }

    #[tokio::test]
    #[ignore = "downloads all-MiniLM-L6-v2"]
    async fn test_paraphrase_outranks_word_overlap() {
        let embedder = FastEmbedder::from_config(&Config::default_config().embedding).unwrap();

        let question = embedder
            .embed("How much does the automobile cost?")
            .await
            .unwrap();
        let vectors = embedder
            .embed_batch(&[
                "The car is priced at twenty thousand dollars.",
                "The automobile museum does not cost anything to visit much.",
            ])
            .await
            .unwrap();

        assert_eq!(question.len(), 384);
        let relevant = cosine_similarity(&question, &vectors[0]).unwrap();
        let overlapping = cosine_similarity(&question, &vectors[1]).unwrap();
        assert!(relevant > overlapping, "{} <= {}", relevant, overlapping);
    }
}
