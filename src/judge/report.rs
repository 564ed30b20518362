//! Plain-text evaluation report.

use std::fmt::Write as _;

use super::scoring::{EvaluationReport, ScoreBand};

const REPORT_TITLE: &str = "LLM Evaluation Results - Design System MCP Answers (with Pass/Fail)";

/// Renders the annotated grades followed by the summary block.
pub fn render_report(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let threshold = report.pass_threshold;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{REPORT_TITLE}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Pass Threshold: {threshold}/10 (answers scoring {threshold}+ are considered passing)"
    );
    let _ = writeln!(out);

    for record in &report.records {
        let _ = writeln!(out, "{} {}", record.line, record.verdict);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "SUMMARY:");
    let _ = writeln!(out, "- Total Questions: {}", report.total);
    let _ = writeln!(
        out,
        "- Average Score: {:.2}/10 ({}/{} total points)",
        report.average_score,
        report.total_points,
        report.total * 10
    );
    let _ = writeln!(
        out,
        "- Pass Rate: {:.1}% ({} out of {} questions passed)",
        report.pass_rate_percent(),
        report.pass_count,
        report.total
    );
    let _ = writeln!(out, "- Failed Questions: {}", report.fail_count);

    let _ = writeln!(out);
    let _ = writeln!(out, "Score Breakdown:");
    for band in ScoreBand::ALL {
        let count = report.bands.get(band);
        match band_verdict(band, threshold) {
            Some(verdict) => {
                let _ = writeln!(out, "- {}: {} questions {}", band.label(), count, verdict);
            }
            None => {
                let _ = writeln!(out, "- {}: {} questions", band.label(), count);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Critical Failures:");
    for failure in &report.failures {
        let _ = writeln!(out, "- {failure}");
    }

    out
}

/// Verdict shared by every score in the band, if any.
fn band_verdict(band: ScoreBand, threshold: u32) -> Option<&'static str> {
    let (low, high) = band.range();
    if low >= threshold {
        Some("[PASS]")
    } else if high < threshold {
        Some("[FAIL]")
    } else {
        None
    }
}
