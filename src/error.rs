//! Error types for qa-harness operations.
//!
//! Defines error types for the subsystems that can fail:
//! - Artifact reading and writing
//! - Answer scoring (judge invocation and score parsing)
//!
//! Assistant invocation errors live with the adapters in
//! [`crate::runner::agents`], configuration errors in [`crate::config`].

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::runner::agents::AgentError;

/// Errors that can occur while reading or writing flat-file artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArtifactError {
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Errors that abort a scoring run. No report is written when one occurs.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Judge invocation failed: {0}")]
    Invocation(#[from] AgentError),

    #[error("Judge exited with code {code}: {stderr}")]
    JudgeFailed { code: i32, stderr: String },

    #[error("No scores found in evaluation output")]
    NoScores,

    #[error("No aligned questions to evaluate")]
    EmptyEvaluationSet,

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
