//! Evaluation set loading and alignment.
//!
//! An evaluation set is three question-indexed collections loaded from flat
//! text artifacts:
//!
//! - the question list (`- <question>` lines)
//! - the extracted-answer artifact written by the runner (`## Question <n>` sections)
//! - the expected-answer key (`Expected Answer:` markers)
//!
//! Position `i` in each collection refers to the same question. When the
//! collections have different lengths they are truncated to the shortest one
//! before pairing.

pub mod artifact;
pub mod parser;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ArtifactError;

pub use artifact::{format_section, SectionWriter};
pub use parser::{parse_answer_sections, parse_expected_answers, parse_questions};

/// The three parsed collections, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationSet {
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    pub expected: Vec<String>,
}

/// One question paired with its produced and expected answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedEntry {
    /// 1-based question number.
    #[serde(rename = "question_num")]
    pub number: usize,
    pub question: String,
    /// Answer produced by the assistant (possibly empty).
    #[serde(rename = "mcp_answer")]
    pub answer: String,
    #[serde(rename = "expected_answer")]
    pub expected: String,
}

impl EvaluationSet {
    /// Builds a set from already-loaded artifact contents.
    pub fn from_contents(questions: &str, answers: &str, expected: &str) -> Self {
        Self {
            questions: parse_questions(questions),
            answers: parse_answer_sections(answers),
            expected: parse_expected_answers(expected),
        }
    }

    /// Reads and parses the three artifacts.
    pub fn load(
        questions_path: &Path,
        answers_path: &Path,
        expected_path: &Path,
    ) -> Result<Self, ArtifactError> {
        let questions = read_artifact(questions_path)?;
        let answers = read_artifact(answers_path)?;
        let expected = read_artifact(expected_path)?;

        let set = Self::from_contents(&questions, &answers, &expected);
        info!(
            questions = set.questions.len(),
            answers = set.answers.len(),
            expected = set.expected.len(),
            "Parsed evaluation set"
        );
        Ok(set)
    }

    /// Number of entries that can be paired across all three collections.
    pub fn aligned_len(&self) -> usize {
        self.questions
            .len()
            .min(self.answers.len())
            .min(self.expected.len())
    }

    /// Pairs the collections position by position, truncated to the shortest.
    pub fn aligned(&self) -> Vec<AlignedEntry> {
        let len = self.aligned_len();
        if len != self.questions.len() || len != self.answers.len() || len != self.expected.len()
        {
            warn!(
                questions = self.questions.len(),
                answers = self.answers.len(),
                expected = self.expected.len(),
                aligned = len,
                "Evaluation set collections differ in length; truncating"
            );
        }

        self.questions
            .iter()
            .zip(&self.answers)
            .zip(&self.expected)
            .enumerate()
            .map(|(index, ((question, answer), expected))| AlignedEntry {
                number: index + 1,
                question: question.clone(),
                answer: answer.clone(),
                expected: expected.clone(),
            })
            .collect()
    }
}

/// Reads a UTF-8 artifact, naming the path on failure.
pub fn read_artifact(path: &Path) -> Result<String, ArtifactError> {
    std::fs::read_to_string(path).map_err(|e| ArtifactError::read(path, e))
}
