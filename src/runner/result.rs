//! Per-question outcomes and the batch summary.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a single question's invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    /// Assistant ran and an answer block was found.
    Answered,
    /// Assistant ran but no qualifying answer block was found.
    ExtractionMiss,
    /// Assistant could not be invoked or timed out.
    InvocationError,
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Answered => write!(f, "answered"),
            Self::ExtractionMiss => write!(f, "extraction_miss"),
            Self::InvocationError => write!(f, "invocation_error"),
        }
    }
}

/// Result of running the assistant on one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// 1-based question number.
    pub number: usize,
    pub question: String,
    pub status: QuestionStatus,
    /// Extracted final answer, empty on a miss or invocation error.
    pub answer: String,
    /// Exit code of the assistant, `None` when it never ran to completion.
    pub exit_code: Option<i32>,
    /// Trimmed standard error, when non-empty.
    pub stderr: Option<String>,
    /// Invocation error message, when the assistant could not be run.
    pub error: Option<String>,
    pub duration_secs: f64,
}

impl QuestionOutcome {
    pub fn invocation_error(
        number: usize,
        question: impl Into<String>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            number,
            question: question.into(),
            status: QuestionStatus::InvocationError,
            answer: String::new(),
            exit_code: None,
            stderr: None,
            error: Some(error.into()),
            duration_secs: duration.as_secs_f64(),
        }
    }

    /// Whether the assistant process exited non-zero.
    pub fn nonzero_exit(&self) -> bool {
        matches!(self.exit_code, Some(code) if code != 0)
    }
}

/// Summary of a whole runner batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub answers_path: PathBuf,
    pub transcripts_path: PathBuf,
    pub total: usize,
    pub answered: usize,
    pub extraction_misses: usize,
    pub invocation_errors: usize,
    pub nonzero_exits: usize,
    pub avg_duration_secs: f64,
    pub results: Vec<QuestionOutcome>,
}

impl RunSummary {
    /// Builds the summary counters from the per-question outcomes.
    pub fn from_outcomes(
        run_id: impl Into<String>,
        started_at: DateTime<Utc>,
        answers_path: PathBuf,
        transcripts_path: PathBuf,
        results: Vec<QuestionOutcome>,
    ) -> Self {
        let count = |status: QuestionStatus| results.iter().filter(|r| r.status == status).count();
        let total = results.len();
        let avg_duration_secs = if total > 0 {
            results.iter().map(|r| r.duration_secs).sum::<f64>() / total as f64
        } else {
            0.0
        };

        Self {
            run_id: run_id.into(),
            started_at,
            completed_at: Utc::now(),
            answers_path,
            transcripts_path,
            total,
            answered: count(QuestionStatus::Answered),
            extraction_misses: count(QuestionStatus::ExtractionMiss),
            invocation_errors: count(QuestionStatus::InvocationError),
            nonzero_exits: results.iter().filter(|r| r.nonzero_exit()).count(),
            avg_duration_secs,
            results,
        }
    }
}
