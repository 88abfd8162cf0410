// file: src/embedding/openai.rs
// description: OpenAI-compatible embeddings API client
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::config::EmbeddingConfig;
use crate::embedding::Embedder;
use crate::error::{QaError, Result};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [&'a str],
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
    shortenable: bool,
}

/// text-embedding-3 models can shorten their output to a requested size;
/// older models reject the `dimensions` parameter.
fn supports_dimensions(model: &str) -> bool {
    model.starts_with("text-embedding-3")
}

impl OpenAiEmbedder {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        Validator::validate_url(&config.base_url)
            .map_err(|e| QaError::Config(format!("embedding.base_url: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| QaError::Embedding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            shortenable: supports_dimensions(&config.model),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(&'a self, texts: &'a [&'a str]) -> EmbeddingRequest<'a> {
        EmbeddingRequest {
            input: texts,
            model: &self.model,
            dimensions: self.shortenable.then_some(self.dimensions),
        }
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request = self.build_request(texts);

        debug!(
            "Requesting {} embedding(s) from {} ({} chars)",
            texts.len(),
            self.endpoint,
            texts.iter().map(|t| t.len()).sum::<usize>()
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await.map_err(|e| {
            QaError::Embedding(format!("Failed to send embeddings request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(QaError::Embedding(format!(
                "Embeddings request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            QaError::Embedding(format!("Failed to parse embeddings response: {}", e))
        })?;

        self.collect_vectors(parsed, texts.len())
    }

    // Entries may arrive out of order; `index` restores input order.
    fn collect_vectors(&self, parsed: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
        if parsed.data.len() != expected {
            return Err(QaError::Embedding(format!(
                "Expected {} embeddings, received {}",
                expected,
                parsed.data.len()
            )));
        }

        let mut data = parsed.data;
        if data.iter().all(|d| d.index.is_some()) {
            data.sort_by_key(|d| d.index);
        }

        data.into_iter()
            .map(|d| {
                if d.embedding.len() != self.dimensions {
                    Err(QaError::Embedding(format!(
                        "Embedding dimension {} does not match configured {}",
                        d.embedding.len(),
                        self.dimensions
                    )))
                } else {
                    Ok(d.embedding)
                }
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| QaError::Embedding("No embedding data returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EmbeddingProvider};

    fn embedder(dimensions: usize) -> OpenAiEmbedder {
        let mut config = Config::default_config().embedding;
        config.provider = EmbeddingProvider::OpenAi;
        config.base_url = "http://localhost:8080/v1/".to_string();
        config.dimensions = dimensions;
        OpenAiEmbedder::from_config(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(embedder(3).endpoint(), "http://localhost:8080/v1/embeddings");
    }

    #[test]
    fn test_request_asks_for_configured_dimensions() {
        let mut config = Config::default_config().embedding;
        config.provider = EmbeddingProvider::OpenAi;
        config.model = "text-embedding-3-small".to_string();
        let embedder = OpenAiEmbedder::from_config(&config).unwrap();

        let json = serde_json::to_value(embedder.build_request(&["revenue"])).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["dimensions"], config.dimensions);
        assert_eq!(embedder.dimensions(), config.dimensions);
    }

    #[test]
    fn test_request_omits_dimensions_for_fixed_size_models() {
        let mut config = Config::default_config().embedding;
        config.model = "text-embedding-ada-002".to_string();
        config.dimensions = 1536;
        let embedder = OpenAiEmbedder::from_config(&config).unwrap();

        let json = serde_json::to_value(embedder.build_request(&["revenue"])).unwrap();
        assert!(json.get("dimensions").is_none());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = Config::default_config().embedding;
        config.base_url = "localhost:8080".to_string();
        assert!(matches!(
            OpenAiEmbedder::from_config(&config),
            Err(QaError::Config(_))
        ));
    }

    #[test]
    fn test_collect_vectors_restores_index_order() {
        let parsed: EmbeddingResponse = serde_json::from_str(
            r#"{"data":[{"index":1,"embedding":[0.0,1.0]},{"index":0,"embedding":[1.0,0.0]}]}"#,
        )
        .unwrap();

        let vectors = embedder(2).collect_vectors(parsed, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_collect_vectors_rejects_wrong_count_and_dimension() {
        let parsed: EmbeddingResponse =
            serde_json::from_str(r#"{"data":[{"embedding":[1.0,0.0]}]}"#).unwrap();
        assert!(embedder(2).collect_vectors(parsed, 2).is_err());

        let parsed: EmbeddingResponse =
            serde_json::from_str(r#"{"data":[{"embedding":[1.0,0.0,0.5]}]}"#).unwrap();
        assert!(embedder(2).collect_vectors(parsed, 1).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_embedding_error() {
        let mut config = Config::default_config().embedding;
        config.base_url = "http://127.0.0.1:9/v1".to_string();
        config.timeout_secs = 2;
        let embedder = OpenAiEmbedder::from_config(&config).unwrap();

        let result = embedder.embed("hello").await;
        assert!(matches!(result, Err(QaError::Embedding(_))));
    }
}
