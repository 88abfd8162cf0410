// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{QaError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
}

/// Chunking and re-ranking parameters.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct RetrievalConfig {
    /// Approximate word budget per chunk, not a model tokenizer count.
    pub max_tokens: usize,
    /// Share of `max_tokens` a keyword chunk may fill before it is closed.
    pub budget_ratio: f64,
    /// Characters per token used to size fallback windows.
    pub chars_per_token: usize,
    pub top_k: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KeywordConfig {
    /// Replaces the built-in English stop-word list when set.
    pub stopwords_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Local sentence-transformer model (default).
    FastEmbed,
    /// Word-overlap fallback; no model download.
    Hashing,
    OpenAi,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub dimensions: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub pretty: bool,
    pub unavailable_marker: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1500,
            budget_ratio: 0.75,
            chars_per_token: 4,
            top_k: 3,
        }
    }
}

impl RetrievalConfig {
    /// Word count at which a keyword chunk is closed.
    pub fn word_budget(&self) -> f64 {
        self.max_tokens as f64 * self.budget_ratio
    }

    /// Character width of a fallback window.
    pub fn window_chars(&self) -> usize {
        self.max_tokens.saturating_mul(self.chars_per_token)
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(QaError::Config(
                "retrieval.max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.chars_per_token == 0 {
            return Err(QaError::Config(
                "retrieval.chars_per_token must be greater than 0".to_string(),
            ));
        }

        if !(self.budget_ratio > 0.0 && self.budget_ratio <= 1.0) {
            return Err(QaError::Config(format!(
                "retrieval.budget_ratio must be in (0, 1], got {}",
                self.budget_ratio
            )));
        }

        if self.top_k == 0 {
            return Err(QaError::Config(
                "retrieval.top_k must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| QaError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PDF_QA")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| QaError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| QaError::Config(e.to_string()))?;

        config.apply_env_api_key();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            keywords: KeywordConfig::default(),
            embedding: EmbeddingConfig {
                provider: EmbeddingProvider::FastEmbed,
                base_url: "https://api.openai.com/v1".to_string(),
                model: "all-MiniLM-L6-v2".to_string(),
                api_key: None,
                dimensions: 384,
                timeout_secs: 30,
            },
            generation: GenerationConfig {
                base_url: "https://api.groq.com/openai/v1".to_string(),
                model: "openai/gpt-oss-120b".to_string(),
                api_key: None,
                system_prompt: "You are a helpful assistant.".to_string(),
                temperature: 0.7,
                max_tokens: 300,
                timeout_secs: 60,
            },
            output: OutputConfig {
                path: PathBuf::from("data/output/answers.json"),
                pretty: true,
                unavailable_marker: "Data Not Available".to_string(),
            },
        }
    }

    fn apply_env_api_key(&mut self) {
        let Ok(key) = std::env::var("OPENAI_API_KEY") else {
            return;
        };
        if key.trim().is_empty() {
            return;
        }

        if self.generation.api_key.is_none() {
            self.generation.api_key = Some(key.clone());
        }
        if self.embedding.api_key.is_none() {
            self.embedding.api_key = Some(key);
        }
    }

    fn validate(&self) -> Result<()> {
        self.retrieval.validate()?;

        if self.embedding.dimensions == 0 {
            return Err(QaError::Config(
                "embedding.dimensions must be greater than 0".to_string(),
            ));
        }

        if self.generation.temperature < 0.0 {
            return Err(QaError::Config(
                "generation.temperature cannot be negative".to_string(),
            ));
        }

        if self.generation.max_tokens == 0 {
            return Err(QaError::Config(
                "generation.max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
