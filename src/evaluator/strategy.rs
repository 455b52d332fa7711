// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Evaluation strategy trait
//!
//! Each strategy submits the same rubric payload to a different model API
//! surface and returns the raw model text. Strategies form an ordered
//! fallback chain; the evaluator tries each in priority order and stops at
//! the first success.

use async_trait::async_trait;

use super::error::EvaluationError;

/// One unit of evaluation work
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub url: String,
    pub title: String,
    /// Bounded analyzable text from the content extractor
    pub content: String,
    /// Whether the source URL classified as video (drives type coalescing)
    pub is_video: bool,
}

/// Trait for model evaluation strategies
#[async_trait]
pub trait EvaluationStrategy: Send + Sync {
    /// Submit the request and return the raw model response text
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// Whether the strategy is configured (credentials present, etc.)
    fn is_available(&self) -> bool;

    /// Strategy priority (lower = preferred)
    fn priority(&self) -> u8 {
        100
    }
}
