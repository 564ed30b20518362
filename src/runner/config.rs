//! Configuration for runner batches.

use std::path::PathBuf;

use crate::config::DEFAULT_PROMPT_PREFIX;

/// Default question list.
pub const DEFAULT_QUESTIONS_FILE: &str = "EVALUATION_SET_1.md";
/// Default extracted-answer artifact.
pub const DEFAULT_ANSWERS_FILE: &str = "EVALUATION_SET_1_OUTPUT.md";
/// Default full-transcript artifact.
pub const DEFAULT_TRANSCRIPTS_FILE: &str = "EVALUATION_SET_1_FULL_OUTPUT.md";

/// Inputs and outputs of one runner batch.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Question list (`- <question>` lines).
    pub questions_path: PathBuf,
    /// Artifact receiving the extracted answers.
    pub answers_path: PathBuf,
    /// Artifact receiving the full cleaned transcripts.
    pub transcripts_path: PathBuf,
    /// Text prepended to every question.
    pub prompt_prefix: String,
}

impl RunConfig {
    /// Creates a new run configuration with default artifact paths.
    pub fn new(questions_path: impl Into<PathBuf>) -> Self {
        Self {
            questions_path: questions_path.into(),
            answers_path: PathBuf::from(DEFAULT_ANSWERS_FILE),
            transcripts_path: PathBuf::from(DEFAULT_TRANSCRIPTS_FILE),
            prompt_prefix: DEFAULT_PROMPT_PREFIX.to_string(),
        }
    }

    /// Sets the extracted-answer artifact path.
    pub fn with_answers_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.answers_path = path.into();
        self
    }

    /// Sets the full-transcript artifact path.
    pub fn with_transcripts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.transcripts_path = path.into();
        self
    }

    /// Sets the question prefix.
    pub fn with_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = prefix.into();
        self
    }

    /// Composes the prompt sent for one question.
    pub fn prompt_for(&self, question: &str) -> String {
        format!("{}{}", self.prompt_prefix, question)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTIONS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.questions_path, PathBuf::from("EVALUATION_SET_1.md"));
        assert_eq!(config.answers_path, PathBuf::from("EVALUATION_SET_1_OUTPUT.md"));
        assert_eq!(
            config.transcripts_path,
            PathBuf::from("EVALUATION_SET_1_FULL_OUTPUT.md")
        );
    }

    #[test]
    fn test_run_config_builder() {
        let config = RunConfig::new("./set.md")
            .with_answers_path("./out/answers.md")
            .with_transcripts_path("./out/full.md")
            .with_prompt_prefix("Q: ");

        assert_eq!(config.answers_path, PathBuf::from("./out/answers.md"));
        assert_eq!(config.transcripts_path, PathBuf::from("./out/full.md"));
        assert_eq!(config.prompt_for("colors?"), "Q: colors?");
    }
}
