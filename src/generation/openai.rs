// file: src/generation/openai.rs
// description: OpenAI-compatible chat completions client
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::config::GenerationConfig;
use crate::error::{QaError, Result};
use crate::generation::prompt::Prompt;
use crate::generation::{GenerationParams, TextGenerator};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Talks the chat completions protocol; works with OpenAI, Groq, Ollama,
/// vLLM and other compatible servers. The API key is optional for local
/// servers.
pub struct OpenAiCompatibleGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatibleGenerator {
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        Validator::validate_url(&config.base_url)
            .map_err(|e| QaError::Config(format!("generation.base_url: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| QaError::Generation(format!("Failed to build HTTP client: {}", e)))?;

        debug!("Chat completions client: {} at {}", config.model, config.base_url);

        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(&'a self, prompt: &'a Prompt, params: &GenerationParams) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &prompt.system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, prompt: &Prompt, params: &GenerationParams) -> Result<String> {
        let request = self.build_request(prompt, params);

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await.map_err(|e| {
            QaError::Generation(format!("Failed to send chat completion request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(QaError::Generation(format!(
                "Chat completion failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            QaError::Generation(format!("Failed to parse chat completion response: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| QaError::Generation("No completion content returned".to_string()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn generator() -> OpenAiCompatibleGenerator {
        let mut config = Config::default_config().generation;
        config.base_url = "http://localhost:11434/v1/".to_string();
        config.model = "llama3".to_string();
        OpenAiCompatibleGenerator::from_config(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            generator().endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_serialization() {
        let generator = generator();
        let prompt = Prompt {
            system: "You are a helpful assistant.".to_string(),
            user: "Context: c\nQuestion: q\nAnswer:".to_string(),
        };
        let params = GenerationParams {
            temperature: 0.7,
            max_tokens: 300,
        };

        let json = serde_json::to_value(generator.build_request(&prompt, &params)).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Context: c\nQuestion: q\nAnswer:");
    }

    #[test]
    fn test_empty_system_prompt_omitted() {
        let generator = generator();
        let prompt = Prompt {
            system: String::new(),
            user: "hi".to_string(),
        };
        let params = GenerationParams {
            temperature: 0.0,
            max_tokens: 10,
        };

        let request = generator.build_request(&prompt, &params);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
    }

    #[test]
    fn test_response_parsing() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Paris"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Paris"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_generation_error() {
        let mut config = Config::default_config().generation;
        config.base_url = "http://127.0.0.1:9/v1".to_string();
        config.timeout_secs = 2;
        let generator = OpenAiCompatibleGenerator::from_config(&config).unwrap();

        let prompt = Prompt {
            system: String::new(),
            user: "hello".to_string(),
        };
        let params = GenerationParams {
            temperature: 0.7,
            max_tokens: 5,
        };

        let result = generator.generate(&prompt, &params).await;
        assert!(matches!(result, Err(QaError::Generation(_))));
    }
}
