// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sequential analysis pipeline
//!
//! Processes one URL end-to-end at a time (extract -> evaluate ->
//! validate) with a fixed pause between successive evaluator calls, so a
//! single run never exceeds one in-flight evaluation. Individual URL
//! failures are recorded and the batch continues; only a batch with zero
//! accepted results is an error.

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::content::{ContentExtractor, ContentKind};
use crate::evaluator::{DiscernEvaluator, EvaluationRequest};
use crate::search::SearchResultItem;

use super::types::{
    AnalysisFailure, FailureKind, PipelineError, PipelineEvent, PipelineReport, UrlStage,
};

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause between successive evaluator calls, skipped before the first.
    /// Keeps the run inside the upstream evaluator's request-rate limits.
    pub pause_between_calls: Duration,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self {
            pause_between_calls: Duration::from_secs(
                env::var("DISCERN_PAUSE_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(7),
            ),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pause_between_calls: Duration::from_secs(7),
        }
    }
}

/// Orchestrates per-URL extraction, evaluation, and validation
pub struct AnalysisPipeline {
    extractor: Arc<dyn ContentExtractor>,
    evaluator: Arc<dyn DiscernEvaluator>,
    config: PipelineConfig,
    cancel: CancellationToken,
    events: Option<mpsc::UnboundedSender<PipelineEvent>>,
}

impl AnalysisPipeline {
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        evaluator: Arc<dyn DiscernEvaluator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            evaluator,
            config,
            cancel: CancellationToken::new(),
            events: None,
        }
    }

    /// Attach a progress event channel
    pub fn with_events(mut self, events: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Token a caller can use to stop the run between URLs
    ///
    /// Cancellation is coarse-grained: the in-flight URL finishes before
    /// the signal is honored.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(ref sender) = self.events {
            // A dropped receiver must not stop the run
            let _ = sender.send(event);
        }
    }

    fn stage(&self, index: usize, total: usize, url: &str, stage: UrlStage) {
        self.emit(PipelineEvent::StageChanged {
            index,
            total,
            url: url.to_string(),
            stage,
        });
    }

    /// Analyze a batch of search results with partial-success semantics
    ///
    /// Returns the accepted results together with every rejection and its
    /// reason. Fails only when not a single URL was accepted.
    pub async fn run(
        &self,
        search_results: &[SearchResultItem],
    ) -> Result<PipelineReport, PipelineError> {
        let total = search_results.len();
        let mut results = Vec::new();
        let mut failures: Vec<AnalysisFailure> = Vec::new();
        let mut evaluations_started = 0usize;

        info!("Starting DISCERN analysis of {} URLs", total);

        for (index, item) in search_results.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(
                    "Analysis cancelled after {} of {} URLs",
                    index, total
                );
                self.emit(PipelineEvent::Cancelled {
                    processed: index,
                    total,
                });
                break;
            }

            self.stage(index, total, &item.url, UrlStage::Extracting);

            let extracted = match self.extractor.extract(&item.url).await {
                Ok(content) => content,
                Err(e) => {
                    self.reject(&mut failures, index, total, &item.url, (&e).into(), e.to_string());
                    continue;
                }
            };

            // Inter-call spacing, skipped before the first evaluation
            if evaluations_started > 0 && !self.config.pause_between_calls.is_zero() {
                debug!(
                    "Pausing {:?} before next evaluation",
                    self.config.pause_between_calls
                );
                sleep(self.config.pause_between_calls).await;
            }
            evaluations_started += 1;

            self.stage(index, total, &item.url, UrlStage::Evaluating);

            let request = EvaluationRequest {
                url: item.url.clone(),
                // Prefer the page's own title over the search result title
                title: extracted.title.clone().unwrap_or_else(|| item.title.clone()),
                content: match extracted.note {
                    Some(ref note) => format!("{}\n\nNote: {}", extracted.text, note),
                    None => extracted.text.clone(),
                },
                is_video: extracted.kind == ContentKind::Video,
            };

            let result = match self.evaluator.evaluate(&request).await {
                Ok(result) => result,
                Err(e) => {
                    self.reject(&mut failures, index, total, &item.url, (&e).into(), e.to_string());
                    continue;
                }
            };

            self.stage(index, total, &item.url, UrlStage::Validating);

            if let Err(e) = result.validate() {
                self.reject(
                    &mut failures,
                    index,
                    total,
                    &item.url,
                    FailureKind::SchemaViolation,
                    e.to_string(),
                );
                continue;
            }

            self.stage(index, total, &item.url, UrlStage::Accepted);
            self.emit(PipelineEvent::ResultAccepted {
                index,
                url: item.url.clone(),
                total_score: result.total_score,
            });

            info!(
                "Accepted {} with total score {}",
                item.url, result.total_score
            );
            results.push(result);
        }

        self.emit(PipelineEvent::Completed {
            accepted: results.len(),
            rejected: failures.len(),
        });

        info!(
            "Analysis finished: {} accepted, {} rejected",
            results.len(),
            failures.len()
        );

        if results.is_empty() {
            return Err(PipelineError::NoSuccessfulAnalyses {
                attempted: total,
                failures,
            });
        }

        Ok(PipelineReport { results, failures })
    }

    fn reject(
        &self,
        failures: &mut Vec<AnalysisFailure>,
        index: usize,
        total: usize,
        url: &str,
        kind: FailureKind,
        message: String,
    ) {
        warn!("Rejected {}: {} ({})", url, message, kind);
        self.stage(index, total, url, UrlStage::Rejected);
        self.emit(PipelineEvent::UrlRejected {
            index,
            url: url.to_string(),
            kind,
            message: message.clone(),
        });
        failures.push(AnalysisFailure {
            url: url.to_string(),
            kind,
            message,
        });
    }
}
