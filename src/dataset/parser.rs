//! Parsers for the three question-indexed artifacts.
//!
//! Parsing is tolerant: a section that does not carry the expected marker is
//! skipped instead of failing the whole file. Length mismatches caused by
//! skipped sections are handled by [`super::EvaluationSet::aligned`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::artifact::{ANSWER_FIELD, SOURCE_FIELD};

/// Prefix of a question line in the question list.
pub const QUESTION_ITEM_PREFIX: &str = "- ";

/// Marker preceding each reference answer in the answer key.
pub const EXPECTED_ANSWER_MARKER: &str = "Expected Answer:";

static SECTION_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Question \d+").expect("valid section regex"));

/// Parses the question list: every line starting with `- `, marker removed.
pub fn parse_questions(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.strip_prefix(QUESTION_ITEM_PREFIX))
        .map(|question| question.trim().to_string())
        .collect()
}

/// Parses an answer artifact into one flat answer string per section.
///
/// Each section contributes the text from its `**Answer:**` line up to a
/// `**Source:**` line or the end of the section. Non-blank lines are trimmed
/// and joined with single spaces.
pub fn parse_answer_sections(content: &str) -> Vec<String> {
    SECTION_SPLIT
        .split(content)
        .skip(1)
        .enumerate()
        .filter_map(|(index, section)| {
            let answer = parse_answer_section(section);
            if answer.is_none() {
                debug!(section = index + 1, "Skipping section without an answer field");
            }
            answer
        })
        .collect()
}

fn parse_answer_section(section: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    let mut capturing = false;

    for line in section.trim().lines() {
        if let Some(rest) = line.strip_prefix(ANSWER_FIELD) {
            capturing = true;
            parts.push(rest.trim());
        } else if line.starts_with(SOURCE_FIELD) {
            break;
        } else if capturing && !line.trim().is_empty() {
            parts.push(line.trim());
        }
    }

    capturing.then(|| {
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Parses the answer key: the first non-blank line after each
/// `Expected Answer:` marker.
///
/// Every marker yields an entry, empty when no text follows it, so positions
/// stay aligned with the question list.
pub fn parse_expected_answers(content: &str) -> Vec<String> {
    content
        .split(EXPECTED_ANSWER_MARKER)
        .skip(1)
        .enumerate()
        .map(|(index, section)| {
            let answer = section.trim().lines().next().map(str::trim).unwrap_or("");
            if answer.is_empty() {
                debug!(entry = index + 1, "Expected-answer marker has no answer text");
            }
            answer.to_string()
        })
        .collect()
}
