//! qa-harness: question/answer evaluation harness for assistant CLIs.
//!
//! This library runs an assistant over an evaluation set, extracts the final
//! answers from its terminal transcripts, and grades them against an answer
//! key with an LLM judge.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod judge;
pub mod runner;
pub mod transcript;

// Re-export commonly used types
pub use config::{ConfigError, HarnessConfig};
pub use error::{ArtifactError, ScoringError};
pub use runner::{AgentError, RunnerError};
