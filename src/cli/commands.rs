//! CLI command definitions for qa-harness.
//!
//! Two subcommands map onto the two stages of an evaluation:
//! `run` answers every question with the assistant, `score` grades the
//! extracted answers against the answer key with a judge.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::config::HarnessConfig;
use crate::error::ScoringError;
use crate::judge::scorer::{DEFAULT_ANSWER_KEY_FILE, DEFAULT_SCORED_ANSWERS_FILE};
use crate::judge::{render_report, AnswerScorer, ScoreConfig};
use crate::runner::config::{DEFAULT_ANSWERS_FILE, DEFAULT_QUESTIONS_FILE, DEFAULT_TRANSCRIPTS_FILE};
use crate::runner::{BatchRunner, RunConfig};

/// Question/answer evaluation harness for assistant CLIs.
#[derive(Parser)]
#[command(name = "qa-harness")]
#[command(about = "Run an assistant over an evaluation set and grade its answers")]
#[command(version)]
#[command(
    long_about = "qa-harness asks an assistant CLI every question of an evaluation set, extracts the final answers from its transcripts, and grades them against an answer key with an LLM judge.\n\nExample usage:\n  qa-harness run --questions EVALUATION_SET_1.md\n  qa-harness score --answers EVALUATION_ANSWERS_SET_1.md --key EVALUATION_SET_1_ANSWER_KEY.md"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// YAML configuration file.
    #[arg(long, env = "QA_HARNESS_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Ask the assistant every question and save the answers.
    Run(RunArgs),

    /// Grade saved answers against the answer key.
    #[command(alias = "eval")]
    Score(ScoreArgs),
}

/// Arguments for `qa-harness run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Question list (one `- <question>` per line).
    #[arg(short = 'q', long, default_value = DEFAULT_QUESTIONS_FILE)]
    pub questions: PathBuf,

    /// Extracted-answers artifact to write.
    #[arg(short = 'a', long, default_value = DEFAULT_ANSWERS_FILE)]
    pub answers: PathBuf,

    /// Full cleaned transcripts artifact to write.
    #[arg(short = 't', long, default_value = DEFAULT_TRANSCRIPTS_FILE)]
    pub transcripts: PathBuf,

    /// Assistant program (overrides configuration).
    #[arg(long)]
    pub command: Option<String>,

    /// Text prepended to every question (overrides configuration).
    #[arg(long)]
    pub prompt_prefix: Option<String>,

    /// Per-question timeout in seconds, 0 disables it.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output JSON summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `qa-harness score`.
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Question list the answers were produced from.
    #[arg(short = 'q', long, default_value = DEFAULT_QUESTIONS_FILE)]
    pub questions: PathBuf,

    /// Extracted-answers artifact to grade.
    #[arg(short = 'a', long, default_value = DEFAULT_SCORED_ANSWERS_FILE)]
    pub answers: PathBuf,

    /// Expected-answer key.
    #[arg(short = 'k', long, default_value = DEFAULT_ANSWER_KEY_FILE)]
    pub key: PathBuf,

    /// Directory for the prompt, comparison and results files.
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Judge program (overrides configuration).
    #[arg(long)]
    pub command: Option<String>,

    /// Minimum passing score, 0-10 (overrides configuration).
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Judge timeout in seconds, 0 disables it.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output JSON report.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
///
/// For more control over logging initialization, use `parse_cli()` and `run_with_cli()`.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let config = HarnessConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Run(args) => run_batch_command(args, config).await,
        Commands::Score(args) => run_score_command(args, config).await,
    }
}

// ============================================================================
// Run Command Implementation
// ============================================================================

async fn run_batch_command(args: RunArgs, mut config: HarnessConfig) -> anyhow::Result<()> {
    if let Some(command) = args.command {
        config = config.with_command(command);
    }
    if let Some(prefix) = args.prompt_prefix {
        config = config.with_prompt_prefix(prefix);
    }
    if let Some(secs) = args.timeout {
        config = config.with_run_timeout_secs(secs);
    }
    config.validate()?;

    require_file(&args.questions, "Question file")?;

    let adapter = config.run_adapter();
    info!(
        "Running {} over questions from {}",
        adapter.command_line(),
        args.questions.display()
    );

    let run_config = RunConfig::new(args.questions)
        .with_answers_path(args.answers)
        .with_transcripts_path(args.transcripts)
        .with_prompt_prefix(config.prompt_prefix.clone());
    let summary = BatchRunner::new(Arc::new(adapter), run_config).run().await?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary)?;
        println!("{json}");
    } else {
        println!("\n=== Run Results ===");
        println!("Run id:            {}", summary.run_id);
        println!("Total questions:   {}", summary.total);
        println!("Answered:          {}", summary.answered);
        println!("No answer found:   {}", summary.extraction_misses);
        println!("Invocation errors: {}", summary.invocation_errors);
        println!("Non-zero exits:    {}", summary.nonzero_exits);
        println!("Avg duration:      {:.1}s", summary.avg_duration_secs);
        println!();

        for r in &summary.results {
            println!("  Q{} [{}] {:.1}s", r.number, r.status, r.duration_secs);
            if let Some(err) = &r.error {
                println!("    error: {err}");
            }
        }

        println!();
        println!("Answers saved to {}", summary.answers_path.display());
        println!("Full output saved to {}", summary.transcripts_path.display());
    }

    Ok(())
}

// ============================================================================
// Score Command Implementation
// ============================================================================

async fn run_score_command(args: ScoreArgs, mut config: HarnessConfig) -> anyhow::Result<()> {
    if let Some(command) = args.command {
        config = config.with_command(command);
    }
    if let Some(threshold) = args.threshold {
        config = config.with_pass_threshold(threshold);
    }
    if let Some(secs) = args.timeout {
        config = config.with_judge_timeout_secs(secs);
    }
    config.validate()?;

    let score_config = ScoreConfig::new(args.answers)
        .with_questions_path(args.questions)
        .with_key_path(args.key)
        .with_output_dir(args.output_dir)
        .with_pass_threshold(config.pass_threshold);

    let judge = config.judge_adapter();
    let judge_command = judge.command_line();
    let scorer = AnswerScorer::new(Arc::new(judge), score_config);

    let outcome = match scorer.score().await {
        Ok(outcome) => outcome,
        Err(e) => {
            if offers_manual_retry(&e) {
                println!("Automatic evaluation failed. You can run manually with:");
                println!("{}", scorer.config().fallback_command(&judge_command));
            }
            return Err(e.into());
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&outcome.report)?;
        println!("{json}");
    } else {
        println!("{}", render_report(&outcome.report));
        println!("Prompt saved to {}", outcome.prompt_path.display());
        println!("Comparison saved to {}", outcome.comparison_path.display());
        println!("Results saved to {}", outcome.results_path.display());
    }

    Ok(())
}

/// Failures that happen after the grading prompt has been saved.
fn offers_manual_retry(error: &ScoringError) -> bool {
    matches!(
        error,
        ScoringError::Invocation(_) | ScoringError::JudgeFailed { .. } | ScoringError::NoScores
    )
}

fn require_file(path: &Path, what: &str) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!("{} does not exist: {}", what, path.display()));
    }
    Ok(())
}
