// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Human-readable text report

use chrono::Utc;
use std::fmt::Write;

use crate::discern::{
    category_score, criterion_by_id, quality_label, Category, DiscernResult,
};
use crate::pipeline::AnalysisFailure;

const CATEGORIES: [Category; 3] = [Category::Reliability, Category::Quality, Category::Treatment];

/// Render a full analysis report
///
/// Accepted results first with their category sub-scores and per-criterion
/// lines, then the rejected URLs with reasons. Partial failure is part of
/// the report, never masked.
pub fn render_report(results: &[DiscernResult], failures: &[AnalysisFailure]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "DISCERN ANALYSIS REPORT");
    let _ = writeln!(out, "Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(
        out,
        "Results: {} analyzed, {} failed",
        results.len(),
        failures.len()
    );
    let _ = writeln!(out, "{}", "=".repeat(72));

    for (index, result) in results.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {}", index + 1, result.title);
        let _ = writeln!(out, "   URL: {}", result.url);
        let _ = writeln!(out, "   Type: {}", result.content_type);
        let _ = writeln!(
            out,
            "   Total score: {}/75 ({})",
            result.total_score,
            quality_label(result.total_score)
        );

        for category in CATEGORIES {
            let _ = writeln!(
                out,
                "   {}: {}%",
                category.label(),
                category_score(result, category)
            );
        }

        let mut scores = result.scores.clone();
        scores.sort_by_key(|s| s.criteria_id);
        for item in &scores {
            let question = criterion_by_id(item.criteria_id)
                .map(|c| c.question)
                .unwrap_or("Unknown criterion");
            let _ = writeln!(
                out,
                "   {:>2}. {} {}/5 - {}",
                item.criteria_id, question, item.score, item.justification
            );
        }

        if !result.observations.is_empty() {
            let _ = writeln!(out, "   Observations: {}", result.observations);
        }
        let _ = writeln!(out, "{}", "-".repeat(72));
    }

    if !failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "FAILED URLS");
        for failure in failures {
            let _ = writeln!(out, "   {} - {}: {}", failure.url, failure.kind, failure.message);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discern::DiscernScoreItem;
    use crate::pipeline::FailureKind;

    fn sample_result() -> DiscernResult {
        let scores: Vec<DiscernScoreItem> = (1..=15)
            .map(|id| DiscernScoreItem {
                criteria_id: id,
                score: 4,
                justification: format!("Good coverage of criterion {}", id),
            })
            .collect();
        DiscernResult {
            url: "https://example.org/health".to_string(),
            title: "Health guide".to_string(),
            content_type: "HTML".to_string(),
            total_score: 60,
            scores,
            observations: "Comprehensive and well sourced".to_string(),
        }
    }

    #[test]
    fn test_report_contains_result_summary() {
        let report = render_report(&[sample_result()], &[]);
        assert!(report.contains("Health guide"));
        assert!(report.contains("Total score: 60/75 (High Quality)"));
        assert!(report.contains("Reliability: 80%"));
        assert!(report.contains("1. Are the aims clear? 4/5"));
        assert!(report.contains("Comprehensive and well sourced"));
        assert!(!report.contains("FAILED URLS"));
    }

    #[test]
    fn test_report_lists_failures() {
        let failures = vec![AnalysisFailure {
            url: "https://example.org/broken".to_string(),
            kind: FailureKind::Transport,
            message: "HTTP 404".to_string(),
        }];
        let report = render_report(&[sample_result()], &failures);
        assert!(report.contains("FAILED URLS"));
        assert!(report.contains("https://example.org/broken"));
        assert!(report.contains("HTTP 404"));
        assert!(report.contains("1 analyzed, 1 failed"));
    }

    #[test]
    fn test_report_orders_criteria_by_id() {
        let mut result = sample_result();
        result.scores.reverse();
        let report = render_report(&[result], &[]);
        let first = report.find("1. Are the aims clear?").unwrap();
        let last = report.find("15. Does it support shared decision-making?").unwrap();
        assert!(first < last);
    }
}
