// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DISCERN rubric data model
//!
//! The static 15-criterion catalog, the score/result types with their
//! checked invariants, and the pure aggregation functions used for
//! reporting.

pub mod criteria;
pub mod report;
pub mod types;

pub use criteria::{
    criteria_for_category, criterion_by_id, Category, DiscernCriterion, CRITERIA_COUNT,
    DISCERN_CRITERIA, MAX_TOTAL_SCORE, MIN_TOTAL_SCORE,
};
pub use report::{category_score, quality_label};
pub use types::{DiscernResult, DiscernScoreItem, ValidationError};
