//! LLM-as-judge scoring.
//!
//! All aligned entries are graded in a single judge call. The judge answers
//! with `Q<n>: <score> - <reason>` lines which are parsed into
//! [`GradeRecord`]s, aggregated into an [`EvaluationReport`] and rendered as a
//! plain-text report.

pub mod prompt;
pub mod report;
pub mod scorer;
pub mod scoring;

pub use prompt::{build_grading_prompt, GRADING_INSTRUCTIONS};
pub use report::render_report;
pub use scorer::{AnswerScorer, ScoreConfig, ScoreOutcome};
pub use scoring::{
    parse_grade_line, parse_grades, BandCounts, EvaluationReport, GradeRecord, ScoreBand, Verdict,
};
