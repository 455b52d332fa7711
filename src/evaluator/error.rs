// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Evaluator error taxonomy

use thiserror::Error;

/// Errors from model-based rubric evaluation
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Network-level failure reaching the model API
    #[error("evaluator transport error: {0}")]
    Transport(String),

    /// Non-success response from the model API
    #[error("evaluator API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Asynchronous evaluation run ended in a non-completed state
    #[error("evaluation run ended in state {status}")]
    RunIncomplete { status: String },

    /// Completion-polling budget exhausted
    #[error("evaluation still incomplete after {polls} polls")]
    PollBudgetExhausted { polls: u32 },

    /// Model response contained no parseable structured payload
    #[error("no parseable JSON payload in model response")]
    MalformedResponse,

    /// Parseable payload that violates the expected DISCERN shape
    #[error("model response violates the DISCERN schema: {0}")]
    SchemaViolation(String),

    /// Retry budget exhausted; wraps the last error seen
    #[error("evaluation failed after {attempts} attempts: {last_error}")]
    EvaluationFailed { attempts: u32, last_error: String },

    /// No strategy is configured or available
    #[error("no evaluation strategy available")]
    NoStrategyAvailable,
}

impl EvaluationError {
    /// Whether a retry could plausibly succeed
    ///
    /// Schema and parse failures are deterministic for a given payload and
    /// are never retried; transport faults, rate limits, server errors and
    /// stalled runs are.
    pub fn is_transient(&self) -> bool {
        match self {
            EvaluationError::Transport(_)
            | EvaluationError::RunIncomplete { .. }
            | EvaluationError::PollBudgetExhausted { .. } => true,
            EvaluationError::Api { status, .. } => *status == 429 || *status >= 500,
            EvaluationError::MalformedResponse
            | EvaluationError::SchemaViolation(_)
            | EvaluationError::EvaluationFailed { .. }
            | EvaluationError::NoStrategyAvailable => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(EvaluationError::Transport("reset".into()).is_transient());
        assert!(EvaluationError::PollBudgetExhausted { polls: 60 }.is_transient());
        assert!(EvaluationError::Api {
            status: 429,
            message: "rate".into()
        }
        .is_transient());
        assert!(EvaluationError::Api {
            status: 503,
            message: "busy".into()
        }
        .is_transient());
    }

    #[test]
    fn test_non_transient_classification() {
        assert!(!EvaluationError::MalformedResponse.is_transient());
        assert!(!EvaluationError::SchemaViolation("bad".into()).is_transient());
        assert!(!EvaluationError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_transient());
        assert!(!EvaluationError::EvaluationFailed {
            attempts: 3,
            last_error: "x".into()
        }
        .is_transient());
    }
}
