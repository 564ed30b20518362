//! Harness configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `QA_HARNESS_*` environment variables, then command-line flags (applied by
//! the CLI).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runner::agents::CommandAdapter;

/// Default assistant program.
pub const DEFAULT_COMMAND: &str = "q";

/// Default prefix prepended to every question.
pub const DEFAULT_PROMPT_PREFIX: &str = "Using the design system MCP, ";

/// Default minimum score for a passing answer.
pub const DEFAULT_PASS_THRESHOLD: u32 = 6;

/// Default judge timeout in seconds.
pub const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 120;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// The YAML configuration file could not be parsed.
    #[error("Failed to parse configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration shared by the runner and the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Assistant CLI program, used for both answering and judging.
    pub command: String,
    /// Arguments when answering questions.
    pub run_args: Vec<String>,
    /// Arguments when grading answers.
    pub judge_args: Vec<String>,
    /// Text prepended to every question.
    pub prompt_prefix: String,
    /// Per-question timeout in seconds. `None` waits for the assistant.
    pub run_timeout_secs: Option<u64>,
    /// Judge timeout in seconds. `None` waits for the judge.
    pub judge_timeout_secs: Option<u64>,
    /// Minimum score (0-10) for an answer to pass.
    pub pass_threshold: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            run_args: vec![
                "chat".to_string(),
                "--no-interactive".to_string(),
                "--trust-all-tools".to_string(),
            ],
            judge_args: vec!["chat".to_string(), "--no-interactive".to_string()],
            prompt_prefix: DEFAULT_PROMPT_PREFIX.to_string(),
            run_timeout_secs: None,
            judge_timeout_secs: Some(DEFAULT_JUDGE_TIMEOUT_SECS),
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }
}

impl HarnessConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from defaults and environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Loads defaults, an optional YAML file and the environment, then validates.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        let config = config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Overrides fields from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QA_HARNESS_COMMAND`: assistant program (default: q)
    /// - `QA_HARNESS_RUN_ARGS`: whitespace-separated answering arguments
    /// - `QA_HARNESS_JUDGE_ARGS`: whitespace-separated judging arguments
    /// - `QA_HARNESS_PROMPT_PREFIX`: question prefix
    /// - `QA_HARNESS_RUN_TIMEOUT_SECS`: per-question timeout, 0 disables
    /// - `QA_HARNESS_JUDGE_TIMEOUT_SECS`: judge timeout, 0 disables (default: 120)
    /// - `QA_HARNESS_PASS_THRESHOLD`: passing score (default: 6)
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(val) = var("QA_HARNESS_COMMAND") {
            self.command = val;
        }

        if let Some(val) = var("QA_HARNESS_RUN_ARGS") {
            self.run_args = split_args(&val);
        }

        if let Some(val) = var("QA_HARNESS_JUDGE_ARGS") {
            self.judge_args = split_args(&val);
        }

        if let Some(val) = var("QA_HARNESS_PROMPT_PREFIX") {
            self.prompt_prefix = val;
        }

        if let Some(val) = var("QA_HARNESS_RUN_TIMEOUT_SECS") {
            let secs: u64 = parse_env_value(&val, "QA_HARNESS_RUN_TIMEOUT_SECS")?;
            self.run_timeout_secs = (secs > 0).then_some(secs);
        }

        if let Some(val) = var("QA_HARNESS_JUDGE_TIMEOUT_SECS") {
            let secs: u64 = parse_env_value(&val, "QA_HARNESS_JUDGE_TIMEOUT_SECS")?;
            self.judge_timeout_secs = (secs > 0).then_some(secs);
        }

        if let Some(val) = var("QA_HARNESS_PASS_THRESHOLD") {
            self.pass_threshold = parse_env_value(&val, "QA_HARNESS_PASS_THRESHOLD")?;
        }

        Ok(self)
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "command cannot be empty".to_string(),
            ));
        }

        if self.pass_threshold > 10 {
            return Err(ConfigError::ValidationFailed(format!(
                "pass_threshold must be between 0 and 10, got {}",
                self.pass_threshold
            )));
        }

        Ok(())
    }

    /// Sets the assistant program.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Sets the question prefix.
    pub fn with_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = prefix.into();
        self
    }

    /// Sets the passing score.
    pub fn with_pass_threshold(mut self, threshold: u32) -> Self {
        self.pass_threshold = threshold;
        self
    }

    /// Sets the per-question timeout in seconds (0 disables it).
    pub fn with_run_timeout_secs(mut self, secs: u64) -> Self {
        self.run_timeout_secs = (secs > 0).then_some(secs);
        self
    }

    /// Sets the judge timeout in seconds (0 disables it).
    pub fn with_judge_timeout_secs(mut self, secs: u64) -> Self {
        self.judge_timeout_secs = (secs > 0).then_some(secs);
        self
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }

    pub fn judge_timeout(&self) -> Option<Duration> {
        self.judge_timeout_secs.map(Duration::from_secs)
    }

    /// Adapter that answers questions.
    pub fn run_adapter(&self) -> CommandAdapter {
        CommandAdapter::new(&self.command)
            .with_args(&self.run_args)
            .with_timeout(self.run_timeout())
    }

    /// Adapter that grades answers.
    pub fn judge_adapter(&self) -> CommandAdapter {
        CommandAdapter::new(&self.command)
            .with_args(&self.judge_args)
            .with_timeout(self.judge_timeout())
    }
}

fn split_args(value: &str) -> Vec<String> {
    value.split_whitespace().map(String::from).collect()
}

/// Parses an environment variable value into the specified type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.command, "q");
        assert_eq!(config.run_args, vec!["chat", "--no-interactive", "--trust-all-tools"]);
        assert_eq!(config.judge_args, vec!["chat", "--no-interactive"]);
        assert_eq!(config.run_timeout(), None);
        assert_eq!(config.judge_timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.pass_threshold, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = HarnessConfig::default()
            .apply_vars(vars(&[
                ("QA_HARNESS_COMMAND", "kiro-cli"),
                ("QA_HARNESS_RUN_ARGS", "chat  --no-interactive"),
                ("QA_HARNESS_JUDGE_TIMEOUT_SECS", "0"),
                ("QA_HARNESS_RUN_TIMEOUT_SECS", "300"),
                ("QA_HARNESS_PASS_THRESHOLD", " 7 "),
            ]))
            .unwrap();

        assert_eq!(config.command, "kiro-cli");
        assert_eq!(config.run_args, vec!["chat", "--no-interactive"]);
        assert_eq!(config.judge_timeout(), None);
        assert_eq!(config.run_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(config.pass_threshold, 7);
    }

    #[test]
    fn test_invalid_env_value() {
        let err = HarnessConfig::default()
            .apply_vars(vars(&[("QA_HARNESS_PASS_THRESHOLD", "six")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "QA_HARNESS_PASS_THRESHOLD"));
    }

    #[test]
    fn test_adapters_use_stage_arguments() {
        let config = HarnessConfig::default();
        assert_eq!(
            config.run_adapter().command_line(),
            "q chat --no-interactive --trust-all-tools"
        );
        assert_eq!(config.judge_adapter().command_line(), "q chat --no-interactive");
    }

    #[test]
    fn test_validate_threshold() {
        let config = HarnessConfig::default().with_pass_threshold(11);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_file_keeps_defaults_for_missing_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("harness.yaml");
        std::fs::write(&path, "command: my-chat\npass_threshold: 8\n").unwrap();

        let config = HarnessConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.command, "my-chat");
        assert_eq!(config.pass_threshold, 8);
        assert_eq!(config.prompt_prefix, DEFAULT_PROMPT_PREFIX);
        assert_eq!(config.judge_timeout_secs, Some(120));
    }
}
