//! Batch runner - drives the assistant over the question list.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::agents::AssistantAdapter;
use super::config::RunConfig;
use super::result::{QuestionOutcome, QuestionStatus, RunSummary};
use crate::dataset::{parse_questions, read_artifact, SectionWriter};
use crate::error::ArtifactError;
use crate::transcript::{clean_transcript, extract_final_answer};

/// Runs the assistant once per question and persists the transcripts.
pub struct BatchRunner {
    adapter: Arc<dyn AssistantAdapter>,
    config: RunConfig,
}

impl BatchRunner {
    /// Creates a new batch runner.
    pub fn new(adapter: Arc<dyn AssistantAdapter>, config: RunConfig) -> Self {
        Self { adapter, config }
    }

    /// Runs the whole batch.
    ///
    /// A failure on one question is logged and recorded in the summary; only
    /// setup and artifact I/O failures abort the batch.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let run_id = format!("run-{}", Uuid::new_v4());
        let started_at = Utc::now();

        let content = read_artifact(&self.config.questions_path)?;
        let questions = parse_questions(&content);
        if questions.is_empty() {
            return Err(RunnerError::NoQuestions(
                self.config.questions_path.display().to_string(),
            ));
        }

        info!(
            run_id = %run_id,
            questions = questions.len(),
            assistant = self.adapter.name(),
            "Starting batch"
        );

        let mut answers = SectionWriter::create(&self.config.answers_path)?;
        let mut transcripts = SectionWriter::create(&self.config.transcripts_path)?;
        let mut results = Vec::with_capacity(questions.len());

        for (index, question) in questions.iter().enumerate() {
            let number = index + 1;
            info!(question = number, "Processing question {}...", number);

            let (outcome, transcript) = self.run_question(number, question).await;
            answers.write_section(number, question, &outcome.answer)?;
            transcripts.write_section(number, question, &transcript)?;
            results.push(outcome);
        }

        let summary = RunSummary::from_outcomes(
            run_id,
            started_at,
            answers.path().to_path_buf(),
            transcripts.path().to_path_buf(),
            results,
        );

        info!(
            run_id = %summary.run_id,
            answered = summary.answered,
            misses = summary.extraction_misses,
            errors = summary.invocation_errors,
            "Batch completed"
        );

        Ok(summary)
    }

    /// Invokes the assistant for one question. Returns the outcome and the
    /// cleaned transcript (empty when the invocation failed).
    async fn run_question(&self, number: usize, question: &str) -> (QuestionOutcome, String) {
        let prompt = self.config.prompt_for(question);
        let start = Instant::now();

        let output = match self.adapter.invoke(&prompt).await {
            Ok(output) => output,
            Err(e) => {
                error!(question = number, error = %e, "Assistant invocation failed");
                let outcome =
                    QuestionOutcome::invocation_error(number, question, e.to_string(), start.elapsed());
                return (outcome, String::new());
            }
        };

        if let Some(stderr) = output.stderr_text() {
            warn!(question = number, "Error on question {}: {}", number, stderr);
        }
        if !output.is_success() {
            warn!(question = number, exit_code = output.exit_code, "Assistant exited with non-zero status");
        }

        let transcript = clean_transcript(&output.stdout);
        let answer = extract_final_answer(&transcript);
        let status = if answer.is_empty() {
            warn!(question = number, "No answer block found in transcript");
            QuestionStatus::ExtractionMiss
        } else {
            QuestionStatus::Answered
        };

        let outcome = QuestionOutcome {
            number,
            question: question.to_string(),
            status,
            answer,
            exit_code: Some(output.exit_code),
            stderr: output.stderr_text().map(String::from),
            error: None,
            duration_secs: output.duration.as_secs_f64(),
        };
        (outcome, transcript)
    }
}

/// Error types for the runner.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("No questions found in {0} (expected lines starting with \"- \")")]
    NoQuestions(String),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
