// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search provider trait definition

use async_trait::async_trait;

use super::types::{SearchError, SearchResultItem};

/// Trait for implementing search providers
///
/// Providers return ranked result items (ranking assigned from 1 in the
/// order the provider produced them). Multiple providers can be configured
/// with automatic failover.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a keyword search
    ///
    /// # Arguments
    /// * `query` - The search query string
    /// * `num_results` - Maximum number of results to return
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResultItem>, SearchError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Whether the provider can serve requests (API key present, etc.)
    fn is_available(&self) -> bool;

    /// Provider priority (lower = preferred, tried first during failover)
    fn priority(&self) -> u8 {
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProvider {
        available: bool,
    }

    #[async_trait]
    impl SearchProvider for MockProvider {
        async fn search(
            &self,
            query: &str,
            num_results: usize,
        ) -> Result<Vec<SearchResultItem>, SearchError> {
            Ok((1..=num_results as u32)
                .map(|ranking| SearchResultItem {
                    ranking,
                    title: format!("Result {} for {}", ranking, query),
                    url: format!("https://example.com/{}", ranking),
                    snippet: "A mock result".to_string(),
                })
                .collect())
        }

        fn name(&self) -> &'static str {
            "mock"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn priority(&self) -> u8 {
            50
        }
    }

    #[tokio::test]
    async fn test_mock_provider_ranks_from_one() {
        let provider = MockProvider { available: true };
        let results = provider.search("diabetes", 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].ranking, 1);
        assert_eq!(results[2].ranking, 3);
    }

    #[test]
    fn test_default_priority() {
        struct DefaultPriorityProvider;

        #[async_trait]
        impl SearchProvider for DefaultPriorityProvider {
            async fn search(
                &self,
                _query: &str,
                _num_results: usize,
            ) -> Result<Vec<SearchResultItem>, SearchError> {
                Ok(vec![])
            }

            fn name(&self) -> &'static str {
                "default"
            }

            fn is_available(&self) -> bool {
                true
            }
        }

        assert_eq!(DefaultPriorityProvider.priority(), 100);
    }

    #[test]
    fn test_mock_provider_availability() {
        assert!(MockProvider { available: true }.is_available());
        assert!(!MockProvider { available: false }.is_available());
    }
}
