// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use pdf_qa::utils::logging::{
    format_answer, format_error, format_similarity, format_stage, format_success, format_warning,
};
use pdf_qa::{
    Config, JsonExporter, KeywordExtractor, QaPipeline, StopWords, TextExtractor, Validator,
    parse_questions,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pdf_qa")]
#[command(version)]
#[command(about = "Answer natural-language questions about a PDF document", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a comma-separated batch of questions about a PDF
    Ask {
        #[arg(long, value_name = "FILE")]
        pdf: PathBuf,

        /// Comma-separated questions
        #[arg(short, long)]
        questions: String,

        /// Answers file (defaults to output.path from the configuration)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(long)]
        no_export: bool,

        #[arg(long)]
        no_progress: bool,
    },

    /// Print the text extracted from a PDF
    Extract {
        #[arg(long, value_name = "FILE")]
        pdf: PathBuf,

        /// Print the whole text instead of a preview
        #[arg(long)]
        full: bool,
    },

    /// Print the keyword set pooled from a batch of questions
    Keywords {
        #[arg(short, long)]
        questions: String,
    },

    /// Show the top-ranked chunks for one question
    Rank {
        #[arg(long, value_name = "FILE")]
        pdf: PathBuf,

        #[arg(short, long)]
        question: String,

        /// Comma-separated questions to pool keywords from (defaults to the question)
        #[arg(long)]
        keywords_from: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    pdf_qa::utils::logging::init_logger(cli.color, cli.verbose);

    info!("PDF Question Answering Pipeline");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    let result = match cli.command {
        Commands::Ask {
            pdf,
            questions,
            output,
            no_export,
            no_progress,
        } => cmd_ask(&config, &pdf, &questions, output, no_export, no_progress).await,
        Commands::Extract { pdf, full } => cmd_extract(&pdf, full),
        Commands::Keywords { questions } => cmd_keywords(&config, &questions),
        Commands::Rank {
            pdf,
            question,
            keywords_from,
        } => cmd_rank(&config, &pdf, &question, keywords_from.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }

    Ok(())
}

async fn cmd_ask(
    config: &Config,
    pdf: &Path,
    questions: &str,
    output: Option<PathBuf>,
    no_export: bool,
    no_progress: bool,
) -> Result<()> {
    let start_time = Instant::now();
    Validator::validate_content_not_empty(questions).context("No questions given")?;
    let questions = parse_questions(questions);

    let pipeline = QaPipeline::from_config(config)
        .context("Failed to initialize pipeline")?
        .with_progress(!no_progress);

    eprintln!("{}", format_stage(1, 3, &format!("Extracting text from {}", pdf.display())));
    let document = pipeline
        .extract_text(pdf)
        .context("Failed to extract text from PDF")?;

    eprintln!(
        "{}",
        format_stage(2, 3, &format!("Answering {} question(s)", questions.len()))
    );
    let report = pipeline
        .run_on_document(&document, &questions)
        .await
        .context("Question batch failed")?;

    let marker = &config.output.unavailable_marker;
    for result in report.answers.results() {
        println!("\n{}", format_answer(result, marker));
    }
    println!();

    if no_export {
        eprintln!("{}", format_warning("Export skipped (--no-export)"));
    } else {
        eprintln!("{}", format_stage(3, 3, "Exporting answers"));
        let output_path = output.unwrap_or_else(|| config.output.path.clone());
        let exporter = JsonExporter::new(&output_path)?;
        let manifest = exporter
            .export(&report, marker, config.output.pretty)
            .context("Failed to export answers")?;
        eprintln!(
            "{}",
            format_success(&format!(
                "Wrote {} (run {})",
                exporter.output_path().display(),
                manifest.run_id
            ))
        );
    }

    let stats = &report.stats;
    let summary = format!(
        "{}/{} answered ({:.0}%), {} chunks ranked in {:.2}s",
        stats.questions_answered,
        stats.total_questions(),
        stats.answer_rate(),
        stats.chunks_ranked,
        start_time.elapsed().as_secs_f64()
    );
    if stats.questions_unavailable > 0 {
        eprintln!("{}", format_warning(&summary));
    } else {
        eprintln!("{}", format_success(&summary));
    }

    Ok(())
}

fn cmd_extract(pdf: &Path, full: bool) -> Result<()> {
    let document = TextExtractor::new()
        .extract_file(pdf)
        .context("Failed to extract text from PDF")?;

    eprintln!(
        "{}",
        format_success(&format!(
            "{}: {} page(s), {} words, sha256 {}",
            document.source().display(),
            document.page_count,
            document.word_count(),
            document.content_hash
        ))
    );

    if full {
        println!("{}", document.as_str());
    } else {
        println!("{}", Validator::truncate_text(document.as_str(), 1000));
    }

    Ok(())
}

fn cmd_keywords(config: &Config, questions: &str) -> Result<()> {
    let stop_words = StopWords::load(config.keywords.stopwords_path.as_deref())
        .context("Failed to load stop words")?;
    let keywords = KeywordExtractor::new(stop_words)
        .extract(&parse_questions(questions))
        .context("Failed to extract keywords")?;

    eprintln!("{}", format_success(&format!("{} keyword(s)", keywords.len())));
    for keyword in keywords.sorted() {
        println!("{}", keyword);
    }

    Ok(())
}

async fn cmd_rank(
    config: &Config,
    pdf: &Path,
    question: &str,
    keywords_from: Option<&str>,
) -> Result<()> {
    let pipeline = QaPipeline::from_config(config).context("Failed to initialize pipeline")?;
    let document = pipeline
        .extract_text(pdf)
        .context("Failed to extract text from PDF")?;

    let sources = match keywords_from {
        Some(raw) => parse_questions(raw),
        None => vec![question.to_string()],
    };
    let keywords = pipeline
        .extract_keywords(&sources)
        .context("Failed to extract keywords")?;

    let chunks = pipeline
        .ranker()
        .chunk_and_rank(document.as_str(), &keywords, question)
        .await
        .context("Failed to chunk document")?;

    if chunks.is_empty() {
        eprintln!("{}", format_warning("Semantic ranking produced no chunks"));
        return Ok(());
    }

    println!("\nTop chunks for: \"{}\"\n", question);
    println!("{}", "=".repeat(80));
    for (idx, chunk) in chunks.iter().enumerate() {
        println!(
            "\n{}. [{}] {}",
            idx + 1,
            format_similarity(chunk.similarity),
            chunk.format_summary(300)
        );
    }
    println!("{}", "=".repeat(80));

    Ok(())
}
