// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search service orchestration
//!
//! Coordinates providers with failover, rate limiting, and the over-fetch
//! compensation that papers over provider undercounts.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::config::SearchConfig;
use super::duckduckgo::DuckDuckGoProvider;
use super::provider::SearchProvider;
use super::serpapi::SerpApiProvider;
use super::types::{SearchError, SearchMetadata, SearchOutcome, SearchResultItem};

/// Main search service
pub struct SearchService {
    providers: Vec<Box<dyn SearchProvider>>,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    config: SearchConfig,
}

impl SearchService {
    /// Create a new search service from configuration
    pub fn new(config: SearchConfig) -> Self {
        let mut providers: Vec<Box<dyn SearchProvider>> = Vec::new();

        if let Some(ref api_key) = config.serp_api_key {
            if !api_key.is_empty() {
                providers.push(Box::new(SerpApiProvider::new(
                    api_key.clone(),
                    config.locale.clone(),
                )));
                debug!("SERP API provider enabled");
            }
        }

        // DuckDuckGo is always available as the keyless fallback
        providers.push(Box::new(DuckDuckGoProvider::new()));
        debug!("DuckDuckGo provider enabled (fallback)");

        providers.sort_by_key(|p| p.priority());

        let rpm = NonZeroU32::new(config.rate_limit_per_minute)
            .unwrap_or_else(|| NonZeroU32::new(60).expect("60 is non-zero"));
        let limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rpm)));

        Self {
            providers,
            limiter,
            config,
        }
    }

    /// Search for a keyword
    ///
    /// Requests `quantity + overfetch` results upstream, truncates back to
    /// `quantity`, and reports any shortfall through the outcome metadata.
    /// A shortfall is information for the caller, not an error.
    pub async fn search(
        &self,
        keyword: &str,
        quantity: Option<usize>,
    ) -> Result<SearchOutcome, SearchError> {
        if !self.config.enabled {
            return Err(SearchError::SearchDisabled);
        }

        if keyword.trim().is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "keyword must not be empty".to_string(),
            });
        }

        let quantity = quantity.unwrap_or(self.config.default_num_results);
        let adjusted = quantity + self.config.overfetch;

        if self.limiter.check().is_err() {
            return Err(SearchError::RateLimited {
                retry_after_secs: 60,
            });
        }

        let start = Instant::now();

        for provider in &self.providers {
            if !provider.is_available() {
                continue;
            }

            debug!("Trying search provider: {}", provider.name());

            match provider.search(keyword, adjusted).await {
                Ok(results) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    let outcome = build_outcome(results, quantity, adjusted);

                    info!(
                        "Search complete: {} of {} requested results from {} in {}ms",
                        outcome.metadata.returned,
                        quantity,
                        provider.name(),
                        elapsed_ms
                    );

                    return Ok(outcome);
                }
                Err(e) => {
                    warn!(
                        "Search provider {} failed: {}, trying next",
                        provider.name(),
                        e
                    );
                    continue;
                }
            }
        }

        Err(SearchError::ProviderUnavailable {
            provider: "all".to_string(),
        })
    }

    /// Run several keyword searches concurrently
    ///
    /// Independent keyword searches may fan out; the per-run sequencing
    /// constraint applies to the analysis pipeline, not to search.
    pub async fn batch_search(
        &self,
        keywords: Vec<String>,
        quantity: Option<usize>,
    ) -> Vec<Result<SearchOutcome, SearchError>> {
        let futures: Vec<_> = keywords
            .iter()
            .map(|keyword| self.search(keyword, quantity))
            .collect();

        futures::future::join_all(futures).await
    }

    /// Check if search is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Names of providers currently able to serve requests
    pub fn available_providers(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.name())
            .collect()
    }
}

/// Truncate to the requested quantity, re-rank, and describe the outcome
fn build_outcome(
    results: Vec<SearchResultItem>,
    requested: usize,
    adjusted: usize,
) -> SearchOutcome {
    let received = results.len();

    let results: Vec<SearchResultItem> = results
        .into_iter()
        .take(requested)
        .enumerate()
        .map(|(index, mut item)| {
            item.ranking = index as u32 + 1;
            item
        })
        .collect();

    let returned = results.len();

    let message = if returned < requested {
        format!(
            "Requested {} results (adjusted to {}), but the provider returned only {}",
            requested, adjusted, received
        )
    } else {
        format!("{} results found as requested", returned)
    };

    SearchOutcome {
        results,
        metadata: SearchMetadata {
            requested,
            adjusted,
            received,
            returned,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<SearchResultItem> {
        (1..=count as u32)
            .map(|ranking| SearchResultItem {
                ranking,
                title: format!("Result {}", ranking),
                url: format!("https://example.org/{}", ranking),
                snippet: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_service_enabled_by_default() {
        let service = SearchService::new(SearchConfig::default());
        assert!(service.is_enabled());
    }

    #[test]
    fn test_service_always_has_fallback_provider() {
        let service = SearchService::new(SearchConfig::default());
        assert!(service.available_providers().contains(&"duckduckgo"));
    }

    #[test]
    fn test_service_with_serp_key_prefers_serpapi() {
        let config = SearchConfig {
            serp_api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let service = SearchService::new(config);
        let providers = service.available_providers();
        assert_eq!(providers.first(), Some(&"serpapi"));
        assert!(providers.contains(&"duckduckgo"));
    }

    #[tokio::test]
    async fn test_search_disabled() {
        let config = SearchConfig {
            enabled: false,
            ..Default::default()
        };
        let service = SearchService::new(config);
        let result = service.search("diabetes", None).await;
        assert!(matches!(result, Err(SearchError::SearchDisabled)));
    }

    #[tokio::test]
    async fn test_search_empty_keyword_rejected() {
        let service = SearchService::new(SearchConfig::default());
        let result = service.search("   ", Some(5)).await;
        assert!(matches!(result, Err(SearchError::InvalidQuery { .. })));
    }

    #[test]
    fn test_build_outcome_truncates_overfetch() {
        // 11 received for 10 requested (overfetch 1): truncated back to 10
        let outcome = build_outcome(items(11), 10, 11);
        assert_eq!(outcome.results.len(), 10);
        assert_eq!(outcome.metadata.received, 11);
        assert_eq!(outcome.metadata.returned, 10);
        assert_eq!(outcome.results[9].ranking, 10);
        assert!(outcome.metadata.message.contains("as requested"));
    }

    #[test]
    fn test_build_outcome_reports_shortfall() {
        let outcome = build_outcome(items(7), 10, 11);
        assert_eq!(outcome.metadata.requested, 10);
        assert_eq!(outcome.metadata.adjusted, 11);
        assert_eq!(outcome.metadata.received, 7);
        assert_eq!(outcome.metadata.returned, 7);
        assert!(outcome.metadata.message.contains("only 7"));
    }

    #[test]
    fn test_build_outcome_reranks_from_one() {
        let mut shuffled = items(3);
        shuffled[0].ranking = 99;
        let outcome = build_outcome(shuffled, 3, 4);
        let rankings: Vec<u32> = outcome.results.iter().map(|r| r.ranking).collect();
        assert_eq!(rankings, vec![1, 2, 3]);
    }
}
