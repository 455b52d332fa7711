// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DISCERN score and result types with checked invariants

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::criteria::{CRITERIA_COUNT, MAX_TOTAL_SCORE, MIN_TOTAL_SCORE};

/// One scored criterion for an analyzed URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscernScoreItem {
    /// References `DiscernCriterion::id`
    pub criteria_id: u8,
    /// Score in 1..=5
    pub score: u8,
    /// Non-empty rationale for the score
    pub justification: String,
}

/// A complete DISCERN analysis for one URL
///
/// Created atomically by the evaluator plus validation; a value that has
/// passed [`DiscernResult::validate`] carries exactly 15 scores covering
/// criterion ids 1..=15 with `total_score` equal to their sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscernResult {
    pub url: String,
    pub title: String,
    /// Content classification (HTML, PDF, VIDEO, ...)
    #[serde(rename = "type")]
    pub content_type: String,
    pub total_score: u32,
    pub scores: Vec<DiscernScoreItem>,
    #[serde(default)]
    pub observations: String,
}

/// Structural invariant violations detected by [`DiscernResult::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected {CRITERIA_COUNT} scores, found {found}")]
    WrongScoreCount { found: usize },

    #[error("duplicate score for criterion {id}")]
    DuplicateCriterion { id: u8 },

    #[error("score references unknown criterion id {id}")]
    UnknownCriterion { id: u8 },

    #[error("score {score} for criterion {id} is outside 1..=5")]
    ScoreOutOfRange { id: u8, score: u8 },

    #[error("empty justification for criterion {id}")]
    EmptyJustification { id: u8 },

    #[error("declared total {declared} does not match sum of scores {computed}")]
    TotalMismatch { declared: u32, computed: u32 },

    #[error("total score {total} is outside {MIN_TOTAL_SCORE}..={MAX_TOTAL_SCORE}")]
    TotalOutOfRange { total: u32 },
}

impl DiscernResult {
    /// Sum of the individual criterion scores
    pub fn computed_total(&self) -> u32 {
        self.scores.iter().map(|s| s.score as u32).sum()
    }

    /// Enforce the structural invariants of a complete analysis
    ///
    /// Exactly 15 scores, criterion ids 1..=15 with no duplicates or gaps,
    /// each score in 1..=5 with a non-empty justification, and a declared
    /// total equal to the sum of scores within the instrument's range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scores.len() != CRITERIA_COUNT {
            return Err(ValidationError::WrongScoreCount {
                found: self.scores.len(),
            });
        }

        let mut seen = [false; CRITERIA_COUNT];
        for item in &self.scores {
            let id = item.criteria_id;
            if id == 0 || id as usize > CRITERIA_COUNT {
                return Err(ValidationError::UnknownCriterion { id });
            }
            if seen[id as usize - 1] {
                return Err(ValidationError::DuplicateCriterion { id });
            }
            seen[id as usize - 1] = true;

            if !(1..=5).contains(&item.score) {
                return Err(ValidationError::ScoreOutOfRange {
                    id,
                    score: item.score,
                });
            }
            if item.justification.trim().is_empty() {
                return Err(ValidationError::EmptyJustification { id });
            }
        }

        let computed = self.computed_total();
        if self.total_score != computed {
            return Err(ValidationError::TotalMismatch {
                declared: self.total_score,
                computed,
            });
        }
        if !(MIN_TOTAL_SCORE..=MAX_TOTAL_SCORE).contains(&self.total_score) {
            return Err(ValidationError::TotalOutOfRange {
                total: self.total_score,
            });
        }

        Ok(())
    }
}
