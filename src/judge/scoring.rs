//! Judge output parsing and score aggregation.
//!
//! The judge is asked to answer with one `Q<n>: <score> - <reason>` line per
//! question. Anything else in its output is ignored; a `Q<n>:` line without a
//! usable score is dropped from the aggregate instead of failing the run.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScoringError;

/// Highest score on the grading scale.
pub const MAX_SCORE: u32 = 10;

/// Separator between the score and the judge's reason.
const REASON_SEPARATOR: &str = " - ";

static GRADE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q(\d+):").expect("valid grade line regex"));

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer regex"));

/// Pass/fail classification of a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// Scores at or above the threshold pass.
    pub fn classify(score: u32, pass_threshold: u32) -> Self {
        if score >= pass_threshold {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "[PASS]"),
            Self::Fail => write!(f, "[FAIL]"),
        }
    }
}

/// Score band used in the report breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 10
    Perfect,
    /// 8-9
    High,
    /// 6-7
    Medium,
    /// 0-5
    Low,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 4] = [Self::Perfect, Self::High, Self::Medium, Self::Low];

    pub fn of(score: u32) -> Self {
        match score {
            10.. => Self::Perfect,
            8..=9 => Self::High,
            6..=7 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Inclusive score range of the band.
    pub fn range(&self) -> (u32, u32) {
        match self {
            Self::Perfect => (10, 10),
            Self::High => (8, 9),
            Self::Medium => (6, 7),
            Self::Low => (0, 5),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Perfect => "Perfect Scores (10)",
            Self::High => "High Scores (8-9)",
            Self::Medium => "Medium Scores (6-7)",
            Self::Low => "Low Scores (0-5)",
        }
    }
}

/// Number of graded questions per band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    pub perfect: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl BandCounts {
    pub fn get(&self, band: ScoreBand) -> usize {
        match band {
            ScoreBand::Perfect => self.perfect,
            ScoreBand::High => self.high,
            ScoreBand::Medium => self.medium,
            ScoreBand::Low => self.low,
        }
    }

    fn add(&mut self, band: ScoreBand) {
        match band {
            ScoreBand::Perfect => self.perfect += 1,
            ScoreBand::High => self.high += 1,
            ScoreBand::Medium => self.medium += 1,
            ScoreBand::Low => self.low += 1,
        }
    }
}

/// One question's judge-assigned grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRecord {
    /// Question number as written by the judge.
    pub question_num: u32,
    /// Score in `0..=10`.
    pub score: u32,
    /// Judge's justification, when it gave one after ` - `.
    pub reason: Option<String>,
    pub verdict: Verdict,
    /// The judge line, trimmed.
    pub line: String,
}

impl GradeRecord {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// `Q<n>: <reason>` entry for the failure list.
    pub fn failure_note(&self) -> String {
        format!(
            "Q{}: {}",
            self.question_num,
            self.reason.as_deref().unwrap_or("No explanation")
        )
    }
}

/// Parses one judge line. Returns `None` for lines that are not grade lines
/// or whose score is missing or out of range.
pub fn parse_grade_line(line: &str, pass_threshold: u32) -> Option<GradeRecord> {
    let line = line.trim();
    let caps = GRADE_LINE.captures(line)?;
    let question_num: u32 = caps[1].parse().ok()?;
    let rest = &line[caps.get(0)?.end()..];

    let Some(score) = FIRST_INTEGER
        .find(rest)
        .and_then(|m| m.as_str().parse::<u32>().ok())
    else {
        warn!(question = question_num, line, "Grade line has no score; dropping");
        return None;
    };
    if score > MAX_SCORE {
        warn!(question = question_num, score, "Score outside 0-10; dropping");
        return None;
    }

    Some(GradeRecord {
        question_num,
        score,
        reason: parse_reason(line),
        verdict: Verdict::classify(score, pass_threshold),
        line: line.to_string(),
    })
}

/// Text after the first ` - `, without a trailing `[...]` status annotation.
fn parse_reason(line: &str) -> Option<String> {
    let (_, reason) = line.split_once(REASON_SEPARATOR)?;
    let reason = reason.trim();
    let reason = match reason.rfind(" [") {
        Some(idx) if reason.ends_with(']') => reason[..idx].trim_end(),
        _ => reason,
    };
    Some(reason.to_string())
}

/// Parses every grade line of a judge response, in output order.
pub fn parse_grades(output: &str, pass_threshold: u32) -> Vec<GradeRecord> {
    let records: Vec<GradeRecord> = output
        .lines()
        .filter_map(|line| parse_grade_line(line, pass_threshold))
        .collect();
    debug!(records = records.len(), "Parsed judge output");
    records
}

/// Aggregate statistics over all parsed grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub pass_threshold: u32,
    /// Number of parsed grade lines.
    pub total: usize,
    pub total_points: u32,
    pub average_score: f64,
    pub pass_count: usize,
    pub fail_count: usize,
    /// Fraction of passing grades in `0.0..=1.0`.
    pub pass_rate: f64,
    pub bands: BandCounts,
    /// `Q<n>: <reason>` for every failing grade.
    pub failures: Vec<String>,
    pub records: Vec<GradeRecord>,
}

impl EvaluationReport {
    /// Aggregates parsed grades. Fails when there is nothing to aggregate.
    pub fn from_records(
        records: Vec<GradeRecord>,
        pass_threshold: u32,
    ) -> Result<Self, ScoringError> {
        if records.is_empty() {
            return Err(ScoringError::NoScores);
        }

        let total = records.len();
        let total_points: u32 = records.iter().map(|r| r.score).sum();
        let pass_count = records.iter().filter(|r| r.passed()).count();

        let mut bands = BandCounts::default();
        for record in &records {
            bands.add(ScoreBand::of(record.score));
        }

        let failures = records
            .iter()
            .filter(|r| !r.passed())
            .map(GradeRecord::failure_note)
            .collect();

        Ok(Self {
            pass_threshold,
            total,
            total_points,
            average_score: f64::from(total_points) / total as f64,
            pass_count,
            fail_count: total - pass_count,
            pass_rate: pass_count as f64 / total as f64,
            bands,
            failures,
            records,
        })
    }

    /// Parses a judge response and aggregates it.
    pub fn from_judge_output(output: &str, pass_threshold: u32) -> Result<Self, ScoringError> {
        Self::from_records(parse_grades(output, pass_threshold), pass_threshold)
    }

    pub fn pass_rate_percent(&self) -> f64 {
        self.pass_rate * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_average_pass_rate_and_failures() {
        let report =
            EvaluationReport::from_judge_output("Q1: 8 - good match\nQ2: 3 - missing detail\n", 6)
                .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.average_score, 5.5);
        assert_eq!(report.pass_rate, 0.5);
        assert_eq!(report.pass_rate_percent(), 50.0);
        assert_eq!(report.failures, vec!["Q2: missing detail".to_string()]);
    }

    #[test]
    fn test_pass_fail_boundary() {
        assert_eq!(Verdict::classify(6, 6), Verdict::Pass);
        assert_eq!(Verdict::classify(5, 6), Verdict::Fail);

        let six = parse_grade_line("Q1: 6 - ok", 6).unwrap();
        let five = parse_grade_line("Q2: 5 - meh", 6).unwrap();
        assert!(six.passed());
        assert!(!five.passed());
    }

    #[test]
    fn test_no_grade_lines_is_explicit_failure() {
        let err = EvaluationReport::from_judge_output("I could not evaluate these.\n", 6).unwrap_err();
        assert!(matches!(err, ScoringError::NoScores));

        let err = EvaluationReport::from_judge_output("", 6).unwrap_err();
        assert!(matches!(err, ScoringError::NoScores));
    }

    #[test]
    fn test_line_without_score_is_dropped() {
        let report = EvaluationReport::from_judge_output(
            "Q1: N/A - answer missing\nQ2: 9 - great\n",
            6,
        )
        .unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.records[0].question_num, 2);
    }

    #[test]
    fn test_first_integer_after_colon() {
        let record = parse_grade_line("  Q12: [7] - decent  ", 6).unwrap();
        assert_eq!(record.question_num, 12);
        assert_eq!(record.score, 7);
        assert_eq!(record.reason.as_deref(), Some("decent"));
        assert_eq!(record.line, "Q12: [7] - decent");

        let record = parse_grade_line("Q3: score 4/10 - partial", 6).unwrap();
        assert_eq!(record.score, 4);
    }

    #[test]
    fn test_out_of_range_score_is_dropped() {
        assert!(parse_grade_line("Q1: 85 - percent scale", 6).is_none());
    }

    #[test]
    fn test_non_grade_lines_are_ignored() {
        assert!(parse_grade_line("Overall the answers were good.", 6).is_none());
        assert!(parse_grade_line("- Q1: 5 - bulleted", 6).is_none());
        assert!(parse_grade_line("Q: 5 - no number", 6).is_none());
    }

    #[test]
    fn test_reason_annotation_and_missing_reason() {
        let record = parse_grade_line("Q4: 2 - wrong component [FAIL]", 6).unwrap();
        assert_eq!(record.reason.as_deref(), Some("wrong component"));
        assert_eq!(record.failure_note(), "Q4: wrong component");

        let record = parse_grade_line("Q5: 1", 6).unwrap();
        assert_eq!(record.reason, None);
        assert_eq!(record.failure_note(), "Q5: No explanation");

        let record = parse_grade_line("Q6: 3 - first - second", 6).unwrap();
        assert_eq!(record.reason.as_deref(), Some("first - second"));
    }

    #[test]
    fn test_band_breakdown_from_parsed_scores() {
        let output = "Q1: 10 - perfect\nQ2: 9 - close\nQ3: 8 - close\nQ4: 7 - ok\nQ5: 6 - ok\nQ6: 5 - weak\nQ7: 0 - wrong\nQ8: 10 - 10 10 10\n";
        let report = EvaluationReport::from_judge_output(output, 6).unwrap();

        assert_eq!(
            report.bands,
            BandCounts {
                perfect: 2,
                high: 2,
                medium: 2,
                low: 2,
            }
        );
        assert_eq!(report.total_points, 55);
        assert_eq!(report.pass_count, 6);
        assert_eq!(report.fail_count, 2);
    }

    #[test]
    fn test_band_of() {
        assert_eq!(ScoreBand::of(10), ScoreBand::Perfect);
        assert_eq!(ScoreBand::of(8), ScoreBand::High);
        assert_eq!(ScoreBand::of(7), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(5), ScoreBand::Low);
        assert_eq!(ScoreBand::of(0), ScoreBand::Low);
    }

    #[test]
    fn test_custom_threshold() {
        let report = EvaluationReport::from_judge_output("Q1: 7 - ok\nQ2: 8 - good\n", 8).unwrap();
        assert_eq!(report.pass_count, 1);
        assert_eq!(report.failures, vec!["Q1: ok".to_string()]);
    }
}
