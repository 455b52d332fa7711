// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model-based DISCERN rubric evaluation
//!
//! Submits extracted content plus the fixed 15-criterion rubric to a
//! model API and parses the structured score set. Strategies form an
//! ordered fallback chain (assistant API first, chat completions as
//! fallback); transient failures are retried with exponential backoff,
//! schema failures are not.

pub mod assistant;
pub mod chat;
pub mod error;
pub mod prompt;
pub mod response;
pub mod strategy;

use async_trait::async_trait;
use std::env;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::discern::DiscernResult;

use assistant::AssistantStrategy;
use chat::ChatStrategy;

pub use error::EvaluationError;
pub use strategy::{EvaluationRequest, EvaluationStrategy};

/// Configuration for the model evaluator
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Model API key; required before the pipeline accepts work
    pub api_key: Option<String>,
    /// Assistant id; enables the assistant strategy when present
    pub assistant_id: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Model for the chat-completions fallback strategy
    pub chat_model: String,
    /// Model call attempts per strategy (retry budget)
    pub max_attempts: u32,
    /// Base backoff delay, doubled per attempt (1s, 2s, 4s at default)
    pub backoff_base_secs: u64,
    /// Poll interval for the assistant run status
    pub poll_interval_secs: u64,
    /// Maximum polls before a run is abandoned
    pub max_polls: u32,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
}

impl EvaluatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").ok(),
            assistant_id: env::var("OPENAI_ASSISTANT_ID").ok(),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            chat_model: env::var("EVALUATOR_CHAT_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            max_attempts: env::var("EVALUATOR_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            backoff_base_secs: env::var("EVALUATOR_BACKOFF_BASE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            poll_interval_secs: env::var("EVALUATOR_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            max_polls: env::var("EVALUATOR_MAX_POLLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            request_timeout_secs: env::var("EVALUATOR_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.as_deref().unwrap_or("").is_empty() {
            return Err("Evaluator API key is not configured".to_string());
        }
        if self.max_attempts == 0 {
            return Err("Evaluator retry budget must be greater than 0".to_string());
        }
        if self.max_polls == 0 {
            return Err("Evaluator poll budget must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_id: None,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            max_attempts: 3,
            backoff_base_secs: 1,
            poll_interval_secs: 10,
            max_polls: 60,
            request_timeout_secs: 60,
        }
    }
}

/// Trait boundary the analysis pipeline depends on
#[async_trait]
pub trait DiscernEvaluator: Send + Sync {
    /// Score content against the DISCERN rubric
    async fn evaluate(&self, request: &EvaluationRequest)
        -> Result<DiscernResult, EvaluationError>;
}

/// Production evaluator: strategy chain + bounded retry
///
/// Stateless between calls; the retry loop's counters are the only local
/// state, so concurrent use from independent pipeline runs is safe.
pub struct ModelEvaluator {
    strategies: Vec<Box<dyn EvaluationStrategy>>,
    config: EvaluatorConfig,
}

impl ModelEvaluator {
    /// Create an evaluator from configuration
    pub fn new(config: EvaluatorConfig) -> Self {
        let api_key = config.api_key.clone().unwrap_or_default();
        let mut strategies: Vec<Box<dyn EvaluationStrategy>> = Vec::new();

        if let Some(ref assistant_id) = config.assistant_id {
            if !assistant_id.is_empty() {
                strategies.push(Box::new(AssistantStrategy::new(
                    api_key.clone(),
                    assistant_id.clone(),
                    config.base_url.clone(),
                    config.poll_interval_secs,
                    config.max_polls,
                    config.request_timeout_secs,
                )));
                debug!("Assistant evaluation strategy enabled");
            }
        }

        strategies.push(Box::new(ChatStrategy::new(
            api_key,
            config.chat_model.clone(),
            config.base_url.clone(),
            config.request_timeout_secs,
        )));
        debug!("Chat evaluation strategy enabled (fallback)");

        strategies.sort_by_key(|s| s.priority());

        Self { strategies, config }
    }

    /// Create an evaluator with injected strategies (tests)
    pub fn with_strategies(
        config: EvaluatorConfig,
        mut strategies: Vec<Box<dyn EvaluationStrategy>>,
    ) -> Self {
        strategies.sort_by_key(|s| s.priority());
        Self { strategies, config }
    }

    /// Run one strategy with the retry budget
    async fn try_strategy(
        &self,
        strategy: &dyn EvaluationStrategy,
        request: &EvaluationRequest,
    ) -> Result<DiscernResult, EvaluationError> {
        let mut last_error = String::new();

        for attempt in 1..=self.config.max_attempts {
            match strategy.evaluate(request).await {
                // Parse errors are deterministic for the payload: no retry
                Ok(raw) => return response::parse_evaluation(&raw, request),
                Err(e) if e.is_transient() => {
                    last_error = e.to_string();
                    if attempt < self.config.max_attempts {
                        let delay = Duration::from_secs(
                            self.config.backoff_base_secs << (attempt - 1),
                        );
                        warn!(
                            "Evaluation attempt {}/{} via {} failed ({}), retrying in {:?}",
                            attempt,
                            self.config.max_attempts,
                            strategy.name(),
                            e,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(EvaluationError::EvaluationFailed {
            attempts: self.config.max_attempts,
            last_error,
        })
    }
}

#[async_trait]
impl DiscernEvaluator for ModelEvaluator {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<DiscernResult, EvaluationError> {
        let mut last_error = EvaluationError::NoStrategyAvailable;

        for strategy in &self.strategies {
            if !strategy.is_available() {
                continue;
            }

            debug!("Evaluating {} via {}", request.url, strategy.name());

            match self.try_strategy(strategy.as_ref(), request).await {
                Ok(result) => return Ok(result),
                // Schema failures are a property of the payload, not the
                // strategy: surface them instead of burning the chain
                Err(e @ EvaluationError::MalformedResponse)
                | Err(e @ EvaluationError::SchemaViolation(_)) => return Err(e),
                Err(e) => {
                    warn!(
                        "Evaluation strategy {} exhausted for {}: {}",
                        strategy.name(),
                        request.url,
                        e
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
