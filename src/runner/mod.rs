//! Transcript runner.
//!
//! Drives the external assistant once per question and persists its answers.
//!
//! # Architecture
//!
//! ```text
//! question list → BatchRunner → AssistantAdapter → raw transcript
//!                                                      ↓
//!        answers artifact ← extract_final_answer ← clean_transcript
//!        transcript artifact ←──────────────────────────┘
//! ```
//!
//! Questions are processed strictly in order, one invocation at a time, and
//! each artifact section is flushed as soon as its question finishes.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use qa_harness::config::HarnessConfig;
//! use qa_harness::runner::{BatchRunner, RunConfig};
//!
//! let harness = HarnessConfig::default();
//! let runner = BatchRunner::new(
//!     Arc::new(harness.run_adapter()),
//!     RunConfig::new("EVALUATION_SET_1.md"),
//! );
//! let summary = runner.run().await?;
//! println!("{} of {} answered", summary.answered, summary.total);
//! ```

pub mod agents;
pub mod config;
pub mod executor;
pub mod result;

pub use agents::{AgentError, AgentOutput, AssistantAdapter, CommandAdapter};
pub use config::RunConfig;
pub use executor::{BatchRunner, RunnerError};
pub use result::{QuestionOutcome, QuestionStatus, RunSummary};
