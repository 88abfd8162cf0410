// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for question batches
// reference: uses indicatif for progress bars and tracks answer counts

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    pub questions_answered: usize,
    pub questions_unavailable: usize,
    pub chunks_ranked: usize,
    pub duration_secs: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_questions(&self) -> usize {
        self.questions_answered + self.questions_unavailable
    }

    pub fn questions_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.total_questions() as f64 / self.duration_secs
    }

    pub fn answer_rate(&self) -> f64 {
        let total = self.total_questions();
        if total == 0 {
            return 0.0;
        }
        (self.questions_answered as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    answered: AtomicUsize,
    unavailable: AtomicUsize,
    chunks_ranked: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_questions: usize) -> Self {
        Self::with_target(total_questions, ProgressDrawTarget::stderr())
    }

    /// Tracks counts without drawing anything.
    pub fn hidden(total_questions: usize) -> Self {
        Self::with_target(total_questions, ProgressDrawTarget::hidden())
    }

    fn with_target(total_questions: usize, target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);

        let main_bar = create_progress_bar(&multi_progress, total_questions as u64);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            answered: AtomicUsize::new(0),
            unavailable: AtomicUsize::new(0),
            chunks_ranked: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_answered(&self) {
        self.answered.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_unavailable(&self) {
        self.unavailable.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_chunks_ranked(&self, count: usize) {
        self.chunks_ranked.fetch_add(count, Ordering::SeqCst);
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Questions complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            questions_answered: self.answered.load(Ordering::SeqCst),
            questions_unavailable: self.unavailable.load(Ordering::SeqCst),
            chunks_ranked: self.chunks_ranked.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    fn update_detail_bar(&self) {
        let answered = self.answered.load(Ordering::SeqCst);
        let unavailable = self.unavailable.load(Ordering::SeqCst);

        let message = format!("Answered: {} | Unavailable: {}", answered, unavailable);

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .expect("Failed to create progress bar template")
            .progress_chars("█▓▒░"),
    );
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_calculations() {
        let stats = PipelineStats {
            questions_answered: 9,
            questions_unavailable: 1,
            chunks_ranked: 25,
            duration_secs: 5.0,
        };

        assert_eq!(stats.total_questions(), 10);
        assert_eq!(stats.questions_per_second(), 2.0);
        assert!((stats.answer_rate() - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_pipeline_stats_zero_duration() {
        let stats = PipelineStats::new();
        assert_eq!(stats.questions_per_second(), 0.0);
        assert_eq!(stats.answer_rate(), 0.0);
    }

    #[test]
    fn test_progress_tracker_counts() {
        let tracker = ProgressTracker::hidden(3);

        tracker.inc_answered();
        tracker.inc_answered();
        tracker.inc_unavailable();
        tracker.add_chunks_ranked(5);

        let stats = tracker.get_stats();
        assert_eq!(stats.questions_answered, 2);
        assert_eq!(stats.questions_unavailable, 1);
        assert_eq!(stats.chunks_ranked, 5);
    }
}
