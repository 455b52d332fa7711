// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pipeline state, outcome, and event types

use serde::Serialize;
use thiserror::Error;

use crate::content::ExtractionError;
use crate::discern::DiscernResult;
use crate::evaluator::EvaluationError;

/// Per-URL processing stage
///
/// `Pending -> Extracting -> Evaluating -> Validating -> Accepted | Rejected`.
/// Terminal stages are `Accepted` and `Rejected`; a rejection never aborts
/// the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStage {
    Pending,
    Extracting,
    Evaluating,
    Validating,
    Accepted,
    Rejected,
}

/// Why a URL was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    UnsupportedContentType,
    EmptyContent,
    UnsafeUrl,
    MalformedResponse,
    SchemaViolation,
    EvaluationFailed,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::Transport => "transport error",
            FailureKind::UnsupportedContentType => "unsupported content type",
            FailureKind::EmptyContent => "empty content",
            FailureKind::UnsafeUrl => "unsafe url",
            FailureKind::MalformedResponse => "malformed model response",
            FailureKind::SchemaViolation => "schema violation",
            FailureKind::EvaluationFailed => "evaluation failed",
        };
        f.write_str(label)
    }
}

impl From<&ExtractionError> for FailureKind {
    fn from(error: &ExtractionError) -> Self {
        match error {
            ExtractionError::Transport { .. }
            | ExtractionError::Timeout { .. }
            | ExtractionError::HttpStatus { .. } => FailureKind::Transport,
            ExtractionError::UnsupportedContentType { .. } => FailureKind::UnsupportedContentType,
            ExtractionError::EmptyContent { .. } => FailureKind::EmptyContent,
            ExtractionError::UnsafeUrl { .. } => FailureKind::UnsafeUrl,
        }
    }
}

impl From<&EvaluationError> for FailureKind {
    fn from(error: &EvaluationError) -> Self {
        match error {
            EvaluationError::MalformedResponse => FailureKind::MalformedResponse,
            EvaluationError::SchemaViolation(_) => FailureKind::SchemaViolation,
            // Transport/API/poll errors only reach the pipeline once the
            // retry budget is gone, so they all count as failed evaluations
            _ => FailureKind::EvaluationFailed,
        }
    }
}

/// A recorded per-URL failure with its reason
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFailure {
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Disposition of one URL after its terminal stage
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Success(DiscernResult),
    Failure(AnalysisFailure),
}

/// Progress events emitted while a batch runs
///
/// Delivered over an unbounded channel so the pipeline never blocks on a
/// slow consumer; the caller renders these as progress feedback.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A URL moved to a new stage
    StageChanged {
        index: usize,
        total: usize,
        url: String,
        stage: UrlStage,
    },
    /// A URL reached `Accepted`
    ResultAccepted {
        index: usize,
        url: String,
        total_score: u32,
    },
    /// A URL reached `Rejected`
    UrlRejected {
        index: usize,
        url: String,
        kind: FailureKind,
        message: String,
    },
    /// The run stopped early on a cancellation signal
    Cancelled { processed: usize, total: usize },
    /// The run finished
    Completed { accepted: usize, rejected: usize },
}

/// Output of a completed batch: accepted results plus recorded failures
///
/// Failures are part of the report, never silently dropped; the caller is
/// expected to show both.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub results: Vec<DiscernResult>,
    pub failures: Vec<AnalysisFailure>,
}

/// Batch-level pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every URL in the batch was rejected
    #[error("no URL produced a successful analysis ({attempted} attempted)")]
    NoSuccessfulAnalyses {
        attempted: usize,
        failures: Vec<AnalysisFailure>,
    },
}
