// file: src/generation/prompt.rs
// description: prompt template rendering and answer cleanup
// reference: Context / Question / Answer completion prompt

pub const DEFAULT_TEMPLATE: &str = "Context: {context}\nQuestion: {question}\nAnswer:";

const CONTEXT_LABEL: &str = "Context:";
const ANSWER_LABEL: &str = "Answer:";

/// A rendered prompt: system instruction plus user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    pub fn render(&self, context: &str, question: &str) -> String {
        // question first so a literal "{context}" inside it is not expanded
        self.template
            .replace("{question}", question)
            .replace("{context}", context)
    }

    /// Strips a prompt echo and a leading `Answer:` label from raw model
    /// output. Returns `None` when nothing is left.
    pub fn clean_completion(prompt: &str, completion: &str) -> Option<String> {
        let mut text = completion.trim_start();

        if let Some(rest) = text.strip_prefix(prompt.trim()) {
            text = rest;
        } else if text.starts_with(CONTEXT_LABEL)
            && let Some(idx) = text.rfind(ANSWER_LABEL)
            && text[..idx].contains("Question:")
        {
            // echoed scaffolding with a different spacing than the prompt
            text = &text[idx..];
        }

        let text = text.trim_start();
        let text = text.strip_prefix(ANSWER_LABEL).unwrap_or(text).trim();

        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new()
    }
}
