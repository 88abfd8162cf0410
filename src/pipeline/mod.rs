// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod progress;

pub use orchestrator::{parse_questions, BatchReport, DocumentSummary, QaPipeline};
pub use progress::{PipelineStats, ProgressTracker};
