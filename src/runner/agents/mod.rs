//! Assistant adapters.
//!
//! The harness treats the chat assistant (and the judge, which is the same
//! CLI in a grading role) as one capability: send a prompt, get back the
//! captured standard output, standard error and exit status. Everything
//! downstream only sees [`AgentOutput`], so the extraction and scoring code
//! can be exercised with a stub adapter.

pub mod command;

use std::time::Duration;

use async_trait::async_trait;

pub use command::CommandAdapter;

/// Captured result of one assistant invocation.
#[derive(Debug, Clone)]
pub struct AgentOutput {
    /// Exit code from the assistant process (-1 when killed by a signal).
    pub exit_code: i32,
    /// Standard output captured.
    pub stdout: String,
    /// Standard error captured.
    pub stderr: String,
    /// Wall-clock time of the invocation.
    pub duration: Duration,
}

impl AgentOutput {
    /// Creates a new agent output.
    pub fn new(exit_code: i32, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
        }
    }

    /// Checks if the assistant completed successfully (exit code 0).
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the error stream when it carries anything besides whitespace.
    pub fn stderr_text(&self) -> Option<&str> {
        let trimmed = self.stderr.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Trait for assistant adapters.
#[async_trait]
pub trait AssistantAdapter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Sends `prompt` to the assistant and waits for it to finish.
    async fn invoke(&self, prompt: &str) -> Result<AgentOutput, AgentError>;
}

/// Error type for assistant invocations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write prompt to assistant: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Assistant timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
