//! Transcript post-processing.
//!
//! The assistant CLI prints a terminal-formatted transcript: colored prose,
//! tool invocation traces and the final answer rendered as a quoted block.
//! This module turns that transcript into plain text and recovers the final
//! answer from it.
//!
//! ```text
//! raw stdout → clean_transcript → AnswerExtractor → extracted answer
//! ```

pub mod clean;
pub mod extract;

pub use clean::{clean_transcript, strip_terminal_codes};
pub use extract::{extract_final_answer, transition, AnswerExtractor, ExtractorState, LineAction};
