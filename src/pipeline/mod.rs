// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis pipeline module
//!
//! Orchestrates per-URL extraction, evaluation, and validation with
//! partial-failure tolerance: rejected URLs are recorded with their
//! reasons and the batch continues. Processing is strictly sequential
//! with a fixed pause between evaluator calls, and a cancellation token
//! is honored between URLs.

pub mod runner;
pub mod types;

pub use runner::{AnalysisPipeline, PipelineConfig};
pub use types::{
    AnalysisFailure, AnalysisOutcome, FailureKind, PipelineError, PipelineEvent, PipelineReport,
    UrlStage,
};
