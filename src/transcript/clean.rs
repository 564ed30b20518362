//! Terminal escape sequence removal.

use std::sync::LazyLock;

use regex::Regex;

/// SGR (color/style) sequences: `ESC [ <digits and ;> m`.
static SGR_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid SGR regex"));

/// Any 7-bit C1 escape or complete CSI sequence.
static TERMINAL_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("valid CSI regex")
});

/// Removes color and style escape sequences from an assistant transcript.
///
/// Every other character, including newlines and non-SGR escapes, is kept
/// verbatim. Cleaning already-clean text returns it unchanged.
pub fn clean_transcript(raw: &str) -> String {
    strip_to_fixpoint(&SGR_SEQUENCE, raw)
}

/// Removes every terminal control sequence, not only styling.
///
/// Judge output may carry cursor movement and erase sequences in addition to
/// colors; those would otherwise break the `Q<n>:` line-start match.
pub fn strip_terminal_codes(raw: &str) -> String {
    strip_to_fixpoint(&TERMINAL_SEQUENCE, raw)
}

/// Removing one sequence can splice a new one together (`ESC [ ESC [0m m`),
/// so keep stripping until nothing matches.
fn strip_to_fixpoint(pattern: &Regex, raw: &str) -> String {
    let mut current = pattern.replace_all(raw, "").into_owned();
    while pattern.is_match(&current) {
        current = pattern.replace_all(&current, "").into_owned();
    }
    current
}
