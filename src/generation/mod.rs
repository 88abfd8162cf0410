// file: src/generation/mod.rs
// description: answer generation from a single context chunk
// reference: context-conditioned text generation with soft failure

pub mod openai;
pub mod prompt;

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::models::Answer;
use crate::utils::{OperationTimer, Validator};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use openai::OpenAiCompatibleGenerator;
pub use prompt::{Prompt, PromptTemplate};

/// Sampling constraints passed with every generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&GenerationConfig> for GenerationParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// A generative language model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt, params: &GenerationParams) -> Result<String>;

    fn name(&self) -> &str;
}

/// Answers a question from one context chunk. Never fails: any generation
/// error, or an empty completion, becomes [`Answer::Unavailable`].
pub struct AnswerGenerator {
    generator: Arc<dyn TextGenerator>,
    template: PromptTemplate,
    system_prompt: String,
    params: GenerationParams,
}

impl AnswerGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &GenerationConfig) -> Self {
        Self {
            generator,
            template: PromptTemplate::new(),
            system_prompt: config.system_prompt.clone(),
            params: GenerationParams::from(config),
        }
    }

    pub fn build_prompt(&self, question: &str, context: &str) -> Prompt {
        Prompt {
            system: self.system_prompt.clone(),
            user: self.template.render(context, question),
        }
    }

    pub async fn generate_answer(&self, question: &str, context: &str) -> Answer {
        debug!(
            "Sending request to {} (context length {}): {}",
            self.generator.name(),
            context.chars().count(),
            Validator::truncate_text(context, 100)
        );

        let prompt = self.build_prompt(question, context);
        let timer = OperationTimer::new("generate_answer");

        let result = self.generator.generate(&prompt, &self.params).await;
        timer.warn_if_slow(Duration::from_secs(30), question);

        match result {
            Ok(completion) => match PromptTemplate::clean_completion(&prompt.user, &completion) {
                Some(answer) => {
                    debug!("Response: {}", Validator::truncate_text(&answer, 200));
                    Answer::Answered(answer)
                }
                None => {
                    warn!("Model returned an empty answer for: {}", question);
                    Answer::Unavailable
                }
            },
            Err(e) => {
                warn!("Error with model {}: {}", self.generator.name(), e);
                Answer::Unavailable
            }
        }
    }
}
