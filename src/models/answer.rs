// file: src/models/answer.rs
// description: answer sentinel type and the ordered question to answer mapping
// reference: internal data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of answering one question. `Unavailable` is the soft-failure
/// sentinel; callers render it with a marker such as "Data Not Available".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Answer {
    Answered(String),
    Unavailable,
}

impl Answer {
    pub fn is_available(&self) -> bool {
        matches!(self, Answer::Answered(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Answer::Answered(text) => Some(text),
            Answer::Unavailable => None,
        }
    }

    pub fn display<'a>(&'a self, unavailable_marker: &'a str) -> &'a str {
        self.text().unwrap_or(unavailable_marker)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResult {
    pub question: String,
    pub answer: Answer,
    /// Why the answer is unavailable, when known.
    pub reason: Option<String>,
    pub chunks_ranked: usize,
    pub duration_ms: u64,
}

/// Question to answer mapping in first-asked order. Asking the same question
/// twice keeps its position and replaces the answer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnswerSheet {
    results: Vec<QuestionResult>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: QuestionResult) {
        if let Some(existing) = self
            .results
            .iter_mut()
            .find(|r| r.question == result.question)
        {
            *existing = result;
        } else {
            self.results.push(result);
        }
    }

    pub fn get(&self, question: &str) -> Option<&Answer> {
        self.results
            .iter()
            .find(|r| r.question == question)
            .map(|r| &r.answer)
    }

    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.results.iter().filter(|r| r.answer.is_available()).count()
    }

    pub fn unavailable_count(&self) -> usize {
        self.len() - self.answered_count()
    }

    /// Flat `{question: answer}` record with unavailable answers rendered as
    /// `unavailable_marker`.
    pub fn to_flat_map(&self, unavailable_marker: &str) -> Map<String, Value> {
        self.results
            .iter()
            .map(|r| {
                (
                    r.question.clone(),
                    Value::String(r.answer.display(unavailable_marker).to_string()),
                )
            })
            .collect()
    }
}
