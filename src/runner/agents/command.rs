//! Command-line assistant adapter.
//!
//! Runs any chat CLI that reads its prompt from stdin, e.g.
//! `q chat --no-interactive --trust-all-tools`.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{AgentError, AgentOutput, AssistantAdapter};

/// Adapter that spawns a CLI assistant once per prompt.
#[derive(Debug, Clone)]
pub struct CommandAdapter {
    /// Program to run.
    program: String,
    /// Arguments passed before the prompt is written to stdin.
    args: Vec<String>,
    /// Upper bound on a single invocation. `None` waits indefinitely.
    timeout: Option<Duration>,
}

impl CommandAdapter {
    /// Creates a new adapter for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Sets the arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The full command line, for logs and the manual fallback hint.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl AssistantAdapter for CommandAdapter {
    fn name(&self) -> &str {
        &self.program
    }

    async fn invoke(&self, prompt: &str) -> Result<AgentOutput, AgentError> {
        let start = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AgentError::Spawn {
                command: self.command_line(),
                source,
            })?;

        // The prompt is written while the output is drained, otherwise a child
        // that fills its stdout pipe before reading stdin never finishes.
        let stdin = child.stdin.take();
        let write_prompt = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(prompt.as_bytes()).await?;
                stdin.shutdown().await.ok();
            }
            Ok::<(), std::io::Error>(())
        };
        let run = async {
            let (written, output) = tokio::join!(write_prompt, child.wait_with_output());
            written.map_err(AgentError::Prompt)?;
            Ok::<_, AgentError>(output?)
        };

        // Dropping the future on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| AgentError::Timeout(limit))??,
            None => run.await?,
        };

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(command = %self.program, exit_code, "Assistant invocation finished");

        Ok(AgentOutput::new(
            exit_code,
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            start.elapsed(),
        ))
    }
}
