// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Category sub-scores and quality labels
//!
//! Pure functions over a completed analysis. Both are deterministic and
//! allocation-free so callers can invoke them repeatedly when rendering.

use super::criteria::{criterion_by_id, Category};
use super::types::DiscernResult;

/// Percentage sub-score for one category, rounded to the nearest integer
///
/// `round(100 * sum(score) / (count * 5))` over the scores whose criterion
/// belongs to `category`. Returns 0 when no scores match, which is a
/// defined edge case rather than an error.
pub fn category_score(result: &DiscernResult, category: Category) -> u8 {
    let mut sum: u32 = 0;
    let mut count: u32 = 0;

    for item in &result.scores {
        let matches = criterion_by_id(item.criteria_id)
            .map(|c| c.category == category)
            .unwrap_or(false);
        if matches {
            sum += item.score as u32;
            count += 1;
        }
    }

    if count == 0 {
        return 0;
    }

    let max = count * 5;
    ((sum as f64 / max as f64) * 100.0).round() as u8
}

/// Fixed quality label over the total score range 15..=75
pub fn quality_label(total_score: u32) -> &'static str {
    if total_score < 30 {
        "Low Quality"
    } else if total_score < 50 {
        "Medium Quality"
    } else {
        "High Quality"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discern::types::DiscernScoreItem;

    fn result_with_uniform_score(score: u8) -> DiscernResult {
        let scores: Vec<DiscernScoreItem> = (1..=15)
            .map(|id| DiscernScoreItem {
                criteria_id: id,
                score,
                justification: "test".to_string(),
            })
            .collect();
        DiscernResult {
            url: "https://example.com".to_string(),
            title: "t".to_string(),
            content_type: "HTML".to_string(),
            total_score: score as u32 * 15,
            scores,
            observations: String::new(),
        }
    }

    #[test]
    fn test_category_score_uniform() {
        let result = result_with_uniform_score(5);
        assert_eq!(category_score(&result, Category::Reliability), 100);
        assert_eq!(category_score(&result, Category::Quality), 100);
        assert_eq!(category_score(&result, Category::Treatment), 100);

        let result = result_with_uniform_score(3);
        assert_eq!(category_score(&result, Category::Reliability), 60);
    }

    #[test]
    fn test_category_score_rounding() {
        let mut result = result_with_uniform_score(1);
        // Reliability criteria are 1..=5; bump two of them to 2:
        // sum = 7 over max 25 -> 28%
        result.scores[0].score = 2;
        result.scores[1].score = 2;
        assert_eq!(category_score(&result, Category::Reliability), 28);
    }

    #[test]
    fn test_category_score_no_matching_scores() {
        let mut result = result_with_uniform_score(3);
        result.scores.retain(|s| s.criteria_id > 5);
        assert_eq!(category_score(&result, Category::Reliability), 0);
    }

    #[test]
    fn test_category_score_is_pure() {
        let result = result_with_uniform_score(4);
        let first = category_score(&result, Category::Treatment);
        let second = category_score(&result, Category::Treatment);
        assert_eq!(first, second);
        assert!(first <= 100);
    }

    #[test]
    fn test_quality_label_boundaries() {
        assert_eq!(quality_label(29), "Low Quality");
        assert_eq!(quality_label(30), "Medium Quality");
        assert_eq!(quality_label(49), "Medium Quality");
        assert_eq!(quality_label(50), "High Quality");
    }

    #[test]
    fn test_quality_label_extremes() {
        assert_eq!(quality_label(15), "Low Quality");
        assert_eq!(quality_label(75), "High Quality");
    }
}
