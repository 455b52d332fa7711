// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DISCERN health-information search and scoring pipeline
//!
//! Searches the web for health content by keyword, extracts analyzable
//! text per result (HTML pages or video metadata plus transcript), scores
//! each against the 15-item DISCERN instrument through a model-based
//! evaluator, validates the structured output, and aggregates per-URL
//! results with partial-failure tolerance.

pub mod cli;
pub mod config;
pub mod content;
pub mod discern;
pub mod evaluator;
pub mod export;
pub mod pipeline;
pub mod search;

// Re-export the main pipeline types
pub use config::{AppConfig, ConfigError};
pub use content::{
    ContentConfig, ContentExtractor, ContentKind, ExtractedContent, ExtractionError,
    WebContentExtractor,
};
pub use discern::{
    category_score, quality_label, Category, DiscernCriterion, DiscernResult, DiscernScoreItem,
    ValidationError, DISCERN_CRITERIA,
};
pub use evaluator::{
    DiscernEvaluator, EvaluationError, EvaluationRequest, EvaluatorConfig, ModelEvaluator,
};
pub use pipeline::{
    AnalysisFailure, AnalysisOutcome, AnalysisPipeline, FailureKind, PipelineConfig,
    PipelineError, PipelineEvent, PipelineReport, UrlStage,
};
pub use search::{
    SearchConfig, SearchError, SearchMetadata, SearchOutcome, SearchProvider, SearchResultItem,
    SearchService,
};
