// file: src/pipeline/orchestrator.rs
// description: drives extraction, keyword gating, ranking and answering for a question batch
// reference: sequential per-question processing with isolated failures

use crate::config::Config;
use crate::embedding;
use crate::error::{QaError, Result};
use crate::extractor::{KeywordExtractor, StopWords, TextExtractor};
use crate::generation::{AnswerGenerator, OpenAiCompatibleGenerator};
use crate::models::{Answer, AnswerSheet, DocumentText, KeywordSet, QuestionResult};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::retrieval::ChunkRanker;
use crate::utils::{OperationTimer, PerformanceMetrics};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Splits a comma-separated question string into trimmed questions. Empty
/// pieces are kept so keyword extraction can reject them.
pub fn parse_questions(raw: &str) -> Vec<String> {
    raw.split(',').map(|q| q.trim().to_string()).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub source: PathBuf,
    pub page_count: usize,
    pub char_count: usize,
    pub content_hash: String,
}

impl From<&DocumentText> for DocumentSummary {
    fn from(document: &DocumentText) -> Self {
        Self {
            source: document.source.clone(),
            page_count: document.page_count,
            char_count: document.char_count(),
            content_hash: document.content_hash.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub document: DocumentSummary,
    pub keywords: Vec<String>,
    pub answers: AnswerSheet,
    pub stats: PipelineStats,
}

pub struct QaPipeline {
    text_extractor: TextExtractor,
    keyword_extractor: KeywordExtractor,
    ranker: ChunkRanker,
    answerer: AnswerGenerator,
    show_progress: bool,
}

impl QaPipeline {
    pub fn new(
        text_extractor: TextExtractor,
        keyword_extractor: KeywordExtractor,
        ranker: ChunkRanker,
        answerer: AnswerGenerator,
    ) -> Self {
        Self {
            text_extractor,
            keyword_extractor,
            ranker,
            answerer,
            show_progress: false,
        }
    }

    /// Builds every component once; the models are shared for the lifetime
    /// of the pipeline.
    pub fn from_config(config: &Config) -> Result<Self> {
        let stop_words = StopWords::load(config.keywords.stopwords_path.as_deref())?;
        let embedder = embedding::from_config(&config.embedding)?;
        let generator = Arc::new(OpenAiCompatibleGenerator::from_config(&config.generation)?);

        info!(
            "Using embedder '{}' ({} dims) and generator '{}'",
            embedder.name(),
            embedder.dimensions(),
            config.generation.model
        );

        Ok(Self::new(
            TextExtractor::new(),
            KeywordExtractor::new(stop_words),
            ChunkRanker::new(embedder, config.retrieval),
            AnswerGenerator::new(generator, &config.generation),
        ))
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn ranker(&self) -> &ChunkRanker {
        &self.ranker
    }

    pub fn extract_text(&self, pdf: &Path) -> Result<DocumentText> {
        let timer = OperationTimer::new("extract_text");
        let document = self.text_extractor.extract_file(pdf)?;
        timer.finish();
        Ok(document)
    }

    pub fn extract_keywords<S: AsRef<str>>(&self, questions: &[S]) -> Result<KeywordSet> {
        let timer = OperationTimer::new("extract_keywords");
        let keywords = self.keyword_extractor.extract(questions)?;
        timer.finish_with_count(keywords.len());
        Ok(keywords)
    }

    /// Answers every question about the PDF at `pdf`.
    ///
    /// Extraction and keyword errors abort the batch. Per-question failures
    /// are recorded as unavailable answers and the batch continues.
    pub async fn run<S: AsRef<str>>(&self, pdf: &Path, questions: &[S]) -> Result<BatchReport> {
        let document = self.extract_text(pdf)?;
        self.run_on_document(&document, questions).await
    }

    pub async fn run_on_document<S: AsRef<str>>(
        &self,
        document: &DocumentText,
        questions: &[S],
    ) -> Result<BatchReport> {
        let keywords = self.extract_keywords(questions)?;
        info!("Extracted {} keywords", keywords.len());

        let tracker = if self.show_progress {
            ProgressTracker::new(questions.len())
        } else {
            ProgressTracker::hidden(questions.len())
        };
        let timer = OperationTimer::new("answer_questions");
        let mut answers = AnswerSheet::new();

        for question in questions {
            let question = question.as_ref();
            tracker.set_message(question.to_string());
            info!("Processing question to generate answer: {}", question);

            let result = self.answer_question(document.as_str(), &keywords, question).await;

            tracker.add_chunks_ranked(result.chunks_ranked);
            if result.answer.is_available() {
                tracker.inc_answered();
            } else {
                tracker.inc_unavailable();
            }
            timer.checkpoint(question);

            answers.record(result);
        }

        tracker.finish();
        let elapsed = timer.finish_with_count(questions.len());
        info!(
            "{}",
            PerformanceMetrics::new("answer_questions", questions.len(), elapsed).format()
        );

        Ok(BatchReport {
            document: DocumentSummary::from(document),
            keywords: keywords.sorted().into_iter().map(str::to_string).collect(),
            answers,
            stats: tracker.get_stats(),
        })
    }

    /// Answers one question; never fails the batch.
    pub async fn answer_question(
        &self,
        text: &str,
        keywords: &KeywordSet,
        question: &str,
    ) -> QuestionResult {
        let started = Instant::now();

        let (answer, reason, chunks_ranked) =
            match self.ranker.chunk_and_rank(text, keywords, question).await {
                Ok(chunks) => match chunks.first() {
                    Some(top) => {
                        info!("{} chunks ranked; top similarity {:.4}", chunks.len(), top.similarity);
                        let answer = self.answerer.generate_answer(question, &top.text).await;
                        let reason = match answer {
                            Answer::Answered(_) => None,
                            Answer::Unavailable => Some("generation failed".to_string()),
                        };
                        (answer, reason, chunks.len())
                    }
                    None => (
                        Answer::Unavailable,
                        Some("semantic ranking failed".to_string()),
                        0,
                    ),
                },
                Err(e) => {
                    warn!("Failed to rank chunks for '{}': {}", question, e);
                    (Answer::Unavailable, Some(reason_for(&e)), 0)
                }
            };

        QuestionResult {
            question: question.to_string(),
            answer,
            reason,
            chunks_ranked,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}

fn reason_for(error: &QaError) -> String {
    match error {
        QaError::NoContent => "no usable content in document".to_string(),
        other => other.to_string(),
    }
}
