//! Final-answer extraction from a cleaned transcript.
//!
//! The assistant renders prose as quoted blocks (`> ...`) and interleaves tool
//! traces (`🛠️ Using tool: ...`, ` ⋮`, ` ●`). Iterative tool-using runs often
//! quote intermediate reasoning before the real answer, so only the last
//! qualifying quoted block is kept.
//!
//! The line-level behaviour lives in the pure [`transition`] function; the
//! [`AnswerExtractor`] only applies the resulting [`LineAction`]s to a buffer.

/// Prefix the assistant uses for its prose lines.
pub const QUOTE_PREFIX: &str = "> ";

/// Glyph printed in front of tool invocations. Matched without the emoji
/// variation selector so both renderings are recognized.
pub const TOOL_GLYPH: &str = "\u{1F6E0}";

/// Phrase printed on tool invocation lines.
pub const TOOL_PHRASE: &str = "Using tool:";

/// Line starts that mark tool traces rather than prose.
pub const TRACE_MARKERS: [&str; 3] = [TOOL_GLYPH, " ⋮", " ●"];

/// Extractor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorState {
    /// Not inside a candidate answer block.
    #[default]
    Idle,
    /// Accumulating lines of the current candidate block.
    Capturing,
}

/// Effect of one line on the answer buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    /// Discard the buffer and start a new block with this content.
    Reset(String),
    /// Append this content to the buffer.
    Append(String),
    /// Leave the buffer untouched.
    Skip,
}

fn is_tool_invocation(line: &str) -> bool {
    line.contains(TOOL_GLYPH) || line.contains(TOOL_PHRASE)
}

fn is_trace_line(line: &str) -> bool {
    TRACE_MARKERS.iter().any(|marker| line.starts_with(marker))
}

fn strip_quote(line: &str) -> &str {
    line.strip_prefix(QUOTE_PREFIX).unwrap_or(line)
}

/// Computes the next state and buffer action for a single transcript line.
pub fn transition(state: ExtractorState, line: &str) -> (ExtractorState, LineAction) {
    let quoted = line.starts_with(QUOTE_PREFIX);

    match state {
        ExtractorState::Idle if quoted && !is_tool_invocation(line) => (
            ExtractorState::Capturing,
            LineAction::Reset(strip_quote(line).to_string()),
        ),
        ExtractorState::Idle => (ExtractorState::Idle, LineAction::Skip),
        ExtractorState::Capturing if quoted || line.trim().is_empty() || !is_trace_line(line) => (
            ExtractorState::Capturing,
            LineAction::Append(strip_quote(line).to_string()),
        ),
        ExtractorState::Capturing => (ExtractorState::Idle, LineAction::Skip),
    }
}

/// Drives [`transition`] over transcript lines and keeps the answer buffer.
#[derive(Debug, Default)]
pub struct AnswerExtractor {
    state: ExtractorState,
    buffer: Vec<String>,
}

impl AnswerExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the machine.
    pub fn state(&self) -> ExtractorState {
        self.state
    }

    /// Feeds one line (without its trailing newline).
    pub fn feed(&mut self, line: &str) {
        let (next, action) = transition(self.state, line);
        match action {
            LineAction::Reset(content) => {
                self.buffer.clear();
                self.buffer.push(content);
            }
            LineAction::Append(content) => self.buffer.push(content),
            LineAction::Skip => {}
        }
        self.state = next;
    }

    /// Returns the captured answer, trimmed. Empty when no block qualified.
    pub fn finish(self) -> String {
        self.buffer.join("\n").trim().to_string()
    }
}

/// Extracts the assistant's final answer from a cleaned transcript.
pub fn extract_final_answer(transcript: &str) -> String {
    let mut extractor = AnswerExtractor::new();
    for line in transcript.split('\n') {
        extractor.feed(line);
    }
    extractor.finish()
}
