// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! SERP API search provider
//!
//! Implements keyword search through serpapi.com's Google front-end.
//! Preferred provider when an API key is configured; locale parameters
//! steer results towards the configured regional Google properties.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResultItem};

const SERP_API_URL: &str = "https://serpapi.com/search.json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Regional Google parameters passed through to the SERP API
#[derive(Debug, Clone)]
pub struct SearchLocale {
    /// Geolocation country code (`gl`), e.g. "br"
    pub country: String,
    /// Interface language (`hl`), e.g. "pt-br"
    pub language: String,
    /// Google domain to query, e.g. "google.com.br"
    pub google_domain: String,
}

impl Default for SearchLocale {
    fn default() -> Self {
        Self {
            country: "br".to_string(),
            language: "pt-br".to_string(),
            google_domain: "google.com.br".to_string(),
        }
    }
}

/// SERP API provider
pub struct SerpApiProvider {
    api_key: String,
    locale: SearchLocale,
    client: Client,
}

impl SerpApiProvider {
    pub fn new(api_key: String, locale: SearchLocale) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            locale,
            client,
        }
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResultItem>, SearchError> {
        let response = self
            .client
            .get(SERP_API_URL)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("q", query),
                ("num", &num_results.to_string()),
                ("gl", &self.locale.country),
                ("hl", &self.locale.language),
                ("google_domain", &self.locale.google_domain),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_ms: REQUEST_TIMEOUT_SECS * 1000,
                    }
                } else {
                    SearchError::ApiError {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(SearchError::RateLimited {
                retry_after_secs: 60,
            });
        }

        if status == 401 || status == 403 {
            return Err(SearchError::NoApiKey {
                provider: "serpapi".to_string(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let data: SerpResponse = response.json().await.map_err(|e| SearchError::ApiError {
            status: 0,
            message: format!("JSON parse error: {}", e),
        })?;

        let organic = data.organic_results.unwrap_or_default();

        Ok(organic
            .into_iter()
            .enumerate()
            .map(|(index, r)| SearchResultItem {
                ranking: index as u32 + 1,
                title: r.title,
                url: r.link,
                snippet: r
                    .snippet
                    .unwrap_or_else(|| "No description available".to_string()),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn priority(&self) -> u8 {
        10 // Preferred provider
    }
}

#[derive(Debug, serde::Deserialize)]
struct SerpResponse {
    organic_results: Option<Vec<SerpOrganicResult>>,
}

#[derive(Debug, serde::Deserialize)]
struct SerpOrganicResult {
    title: String,
    link: String,
    snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = SerpApiProvider::new("test-key".to_string(), SearchLocale::default());
        assert_eq!(provider.name(), "serpapi");
        assert!(provider.is_available());
        assert_eq!(provider.priority(), 10);
    }

    #[test]
    fn test_provider_empty_key_unavailable() {
        let provider = SerpApiProvider::new(String::new(), SearchLocale::default());
        assert!(!provider.is_available());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "organic_results": [
                {
                    "title": "Diabetes overview",
                    "link": "https://example.org/diabetes",
                    "snippet": "Signs, causes and treatment"
                },
                {
                    "title": "No snippet entry",
                    "link": "https://example.org/other"
                }
            ]
        }"#;

        let response: SerpResponse = serde_json::from_str(json).unwrap();
        let organic = response.organic_results.unwrap();
        assert_eq!(organic.len(), 2);
        assert_eq!(organic[0].link, "https://example.org/diabetes");
        assert!(organic[1].snippet.is_none());
    }

    #[test]
    fn test_response_without_organic_results() {
        let response: SerpResponse = serde_json::from_str("{}").unwrap();
        assert!(response.organic_results.is_none());
    }

    #[test]
    fn test_default_locale_targets_brazilian_google() {
        let locale = SearchLocale::default();
        assert_eq!(locale.country, "br");
        assert_eq!(locale.google_domain, "google.com.br");
    }
}
