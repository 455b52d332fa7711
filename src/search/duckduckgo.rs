// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Fallback provider parsing DuckDuckGo's HTML interface with the
//! `scraper` crate. No API key required.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResultItem};

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    client: Client,
}

impl DuckDuckGoProvider {
    pub fn new() -> Self {
        // Realistic browser User-Agent, DDG blocks obvious bots
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for DuckDuckGoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResultItem>, SearchError> {
        let response = self
            .client
            .post(DDG_HTML_URL)
            .form(&[("q", query)])
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

        if !response.status().is_success() {
            return Err(SearchError::ApiError {
                status: response.status().as_u16(),
                message: "DuckDuckGo request failed".to_string(),
            });
        }

        let html = response.text().await.map_err(|e| SearchError::ApiError {
            status: 0,
            message: e.to_string(),
        })?;

        Ok(parse_results(&html, num_results))
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn is_available(&self) -> bool {
        true // No API key needed
    }

    fn priority(&self) -> u8 {
        50 // Fallback provider
    }
}

/// Parse DuckDuckGo HTML results into ranked items
fn parse_results(html: &str, max_results: usize) -> Vec<SearchResultItem> {
    let document = Html::parse_document(html);

    let result_selector = match Selector::parse("div.result") {
        Ok(s) => s,
        Err(_) => return vec![],
    };
    let link_selector = match Selector::parse("a.result__a") {
        Ok(s) => s,
        Err(_) => return vec![],
    };
    let snippet_selector = match Selector::parse(".result__snippet") {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    let mut results = Vec::new();

    for block in document.select(&result_selector) {
        if results.len() >= max_results {
            break;
        }

        let Some(link) = block.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_redirect_url(href) else {
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let snippet = block
            .select(&snippet_selector)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(SearchResultItem {
            ranking: results.len() as u32 + 1,
            title,
            url,
            snippet,
        });
    }

    results
}

/// Unwrap DuckDuckGo's redirect links
///
/// Result hrefs point at `//duckduckgo.com/l/?uddg=<encoded>`; the real
/// target is the `uddg` query parameter. Direct links pass through.
fn resolve_redirect_url(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;

    if parsed.path().starts_with("/l/") {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned());
    }

    if matches!(parsed.scheme(), "http" | "https") {
        return Some(absolute);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DDG_HTML: &str = r#"
        <html><body>
        <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.org%2Fdiabetes&amp;rut=abc">Diabetes guide</a>
            <a class="result__snippet">Symptoms and treatment of diabetes.</a>
        </div>
        <div class="result">
            <a class="result__a" href="https://example.org/hypertension">Blood pressure</a>
            <a class="result__snippet">Managing high blood pressure.</a>
        </div>
        <div class="result">
            <a class="result__a" href="https://example.org/third">Third</a>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_results() {
        let results = parse_results(SAMPLE_DDG_HTML, 10);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].url, "https://example.org/diabetes");
        assert_eq!(results[0].title, "Diabetes guide");
        assert_eq!(results[0].ranking, 1);
        assert_eq!(results[1].url, "https://example.org/hypertension");
        assert_eq!(results[1].ranking, 2);
    }

    #[test]
    fn test_parse_results_respects_max() {
        let results = parse_results(SAMPLE_DDG_HTML, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_parse_results_missing_snippet() {
        let results = parse_results(SAMPLE_DDG_HTML, 10);
        assert!(results[2].snippet.is_empty());
    }

    #[test]
    fn test_resolve_redirect_url() {
        let resolved =
            resolve_redirect_url("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.org%2Fpage");
        assert_eq!(resolved, Some("https://example.org/page".to_string()));
    }

    #[test]
    fn test_resolve_direct_url() {
        let resolved = resolve_redirect_url("https://example.org/page");
        assert_eq!(resolved, Some("https://example.org/page".to_string()));
    }

    #[test]
    fn test_resolve_rejects_other_schemes() {
        assert!(resolve_redirect_url("javascript:alert(1)").is_none());
    }

    #[test]
    fn test_provider_always_available() {
        let provider = DuckDuckGoProvider::new();
        assert!(provider.is_available());
        assert_eq!(provider.priority(), 50);
    }
}
