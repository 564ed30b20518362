//! Answer scorer - grades an answers artifact against its key in one judge call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::prompt::build_grading_prompt;
use super::report::render_report;
use super::scoring::EvaluationReport;
use crate::config::DEFAULT_PASS_THRESHOLD;
use crate::dataset::{AlignedEntry, EvaluationSet};
use crate::error::{ArtifactError, ScoringError};
use crate::runner::agents::AssistantAdapter;
use crate::runner::config::DEFAULT_QUESTIONS_FILE;
use crate::transcript::strip_terminal_codes;

/// Default extracted-answers artifact to score.
pub const DEFAULT_SCORED_ANSWERS_FILE: &str = "EVALUATION_ANSWERS_SET_1.md";

/// Default expected-answer key.
pub const DEFAULT_ANSWER_KEY_FILE: &str = "EVALUATION_SET_1_ANSWER_KEY.md";

const ANSWERS_FILE_PREFIX: &str = "EVALUATION_ANSWERS_";

/// Configuration for a scoring run.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub questions_path: PathBuf,
    pub answers_path: PathBuf,
    pub key_path: PathBuf,
    /// Directory receiving the prompt, comparison and results files.
    pub output_dir: PathBuf,
    pub pass_threshold: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from(DEFAULT_QUESTIONS_FILE),
            answers_path: PathBuf::from(DEFAULT_SCORED_ANSWERS_FILE),
            key_path: PathBuf::from(DEFAULT_ANSWER_KEY_FILE),
            output_dir: PathBuf::from("."),
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }
}

impl ScoreConfig {
    pub fn new(answers_path: impl Into<PathBuf>) -> Self {
        Self {
            answers_path: answers_path.into(),
            ..Default::default()
        }
    }

    pub fn with_questions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.questions_path = path.into();
        self
    }

    pub fn with_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_pass_threshold(mut self, threshold: u32) -> Self {
        self.pass_threshold = threshold;
        self
    }

    /// Suffix shared by every file this run writes, e.g. `set_1` for
    /// `EVALUATION_ANSWERS_SET_1.md`.
    pub fn base_name(&self) -> String {
        let stem = self
            .answers_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        stem.replace(ANSWERS_FILE_PREFIX, "").to_lowercase()
    }

    pub fn prompt_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("evaluation_prompt_{}.txt", self.base_name()))
    }

    pub fn comparison_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("answer_comparison_{}.json", self.base_name()))
    }

    pub fn results_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "evaluation_results_with_pass_fail_{}.txt",
            self.base_name()
        ))
    }

    /// Shell command that grades the saved prompt by hand.
    pub fn fallback_command(&self, judge_command: &str) -> String {
        format!(
            "cat {} | {} > evaluation_results_{}.txt",
            self.prompt_path().display(),
            judge_command,
            self.base_name()
        )
    }
}

/// Files and statistics of a completed scoring run.
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub report: EvaluationReport,
    pub prompt_path: PathBuf,
    pub comparison_path: PathBuf,
    pub results_path: PathBuf,
}

/// Grades an answers artifact with a judge.
pub struct AnswerScorer {
    judge: Arc<dyn AssistantAdapter>,
    config: ScoreConfig,
}

impl AnswerScorer {
    pub fn new(judge: Arc<dyn AssistantAdapter>, config: ScoreConfig) -> Self {
        Self { judge, config }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Loads, aligns and grades the evaluation set.
    ///
    /// The prompt and comparison files are written before the judge is called
    /// so they are available for a manual retry. The results file is only
    /// written when grading succeeds.
    pub async fn score(&self) -> Result<ScoreOutcome, ScoringError> {
        let set = EvaluationSet::load(
            &self.config.questions_path,
            &self.config.answers_path,
            &self.config.key_path,
        )?;
        let entries = set.aligned();
        if entries.is_empty() {
            return Err(ScoringError::EmptyEvaluationSet);
        }

        let prompt = build_grading_prompt(&entries);
        let prompt_path = self.config.prompt_path();
        let comparison_path = self.config.comparison_path();
        write_text(&prompt_path, &prompt)?;
        write_comparison(&comparison_path, &entries)?;
        info!(
            prompt = %prompt_path.display(),
            comparison = %comparison_path.display(),
            "Saved grading inputs"
        );

        info!(judge = self.judge.name(), questions = entries.len(), "Running LLM evaluation...");
        let output = self.judge.invoke(&prompt).await?;
        if !output.is_success() {
            return Err(ScoringError::JudgeFailed {
                code: output.exit_code,
                stderr: output.stderr_text().unwrap_or_default().to_string(),
            });
        }
        if let Some(stderr) = output.stderr_text() {
            warn!(stderr, "Judge wrote to stderr");
        }

        let judged = strip_terminal_codes(&output.stdout);
        let report = EvaluationReport::from_judge_output(&judged, self.config.pass_threshold)?;

        let results_path = self.config.results_path();
        write_text(&results_path, &render_report(&report))?;
        info!(
            results = %results_path.display(),
            average = report.average_score,
            pass_rate = report.pass_rate,
            "Evaluation complete"
        );

        Ok(ScoreOutcome {
            report,
            prompt_path,
            comparison_path,
            results_path,
        })
    }
}

fn write_text(path: &Path, content: &str) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ArtifactError::write(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| ArtifactError::write(path, e))
}

fn write_comparison(path: &Path, entries: &[AlignedEntry]) -> Result<(), ArtifactError> {
    let json = serde_json::to_string_pretty(entries)?;
    write_text(path, &json)
}
