// file: src/utils/logging.rs
// description: tracing setup and colored terminal rendering of batch results
// reference: https://docs.rs/tracing-subscriber

use crate::models::QuestionResult;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// HTTP and ONNX runtime crates are noisy at info level.
const QUIET_DEPENDENCIES: &str = "reqwest=warn,hyper=warn,hyper_util=warn,ort=warn,hf_hub=warn";

/// Installs the global subscriber. Logs go to stderr so answers printed on
/// stdout stay machine-readable. `RUST_LOG` overrides the level.
pub fn init_logger(colored_output: bool, verbose: bool) {
    colored::control::set_override(colored_output);

    let level = if verbose { "pdf_qa=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},{}", level, QUIET_DEPENDENCIES)));

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

/// `[2/3] Answering 4 question(s)`
pub fn format_stage(stage: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", stage, total).cyan().bold(), msg)
}

/// Question line followed by its answer, or the marker and the reason it is
/// unavailable.
pub fn format_answer(result: &QuestionResult, unavailable_marker: &str) -> String {
    let question = format!("{} {}", "Q:".cyan().bold(), result.question);

    let answer = match result.answer.text() {
        Some(text) => format!("{} {}", "A:".green().bold(), text),
        None => format!(
            "{} {} ({})",
            "A:".yellow().bold(),
            unavailable_marker.yellow(),
            result.reason.as_deref().unwrap_or("unknown").dimmed()
        ),
    };

    format!("{}\n{}", question, answer)
}

/// Cosine score colored by strength: green from 0.5, yellow from 0.25.
pub fn format_similarity(score: f32) -> String {
    let text = format!("{:.4}", score);
    if score >= 0.5 {
        text.green().to_string()
    } else if score >= 0.25 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}
