// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for keyword search

use std::env;

use super::serpapi::SearchLocale;

/// Configuration for the search service
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Whether search is enabled
    pub enabled: bool,
    /// SERP API key (preferred provider); DuckDuckGo needs none
    pub serp_api_key: Option<String>,
    /// Regional Google parameters for the SERP provider
    pub locale: SearchLocale,
    /// Extra results requested upstream to compensate for provider
    /// undercounts. Tunable, not a contract; results are always truncated
    /// back to the requested quantity.
    pub overfetch: usize,
    /// Rate limit (requests per minute) across all providers
    pub rate_limit_per_minute: u32,
    /// Default number of results when the caller does not specify one
    pub default_num_results: usize,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("WEB_SEARCH_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            serp_api_key: env::var("SERP_API_KEY").ok(),
            locale: SearchLocale {
                country: env::var("SEARCH_COUNTRY").unwrap_or_else(|_| "br".to_string()),
                language: env::var("SEARCH_LANGUAGE").unwrap_or_else(|_| "pt-br".to_string()),
                google_domain: env::var("SEARCH_GOOGLE_DOMAIN")
                    .unwrap_or_else(|_| "google.com.br".to_string()),
            },
            overfetch: env::var("SEARCH_OVERFETCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            rate_limit_per_minute: env::var("SEARCH_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            default_num_results: env::var("SEARCH_DEFAULT_NUM_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        // DuckDuckGo needs no key, so an absent SERP key is not an error
        if self.rate_limit_per_minute == 0 {
            return Err("Search rate limit must be greater than 0".to_string());
        }
        if self.default_num_results == 0 {
            return Err("Default result count must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            serp_api_key: None,
            locale: SearchLocale::default(),
            overfetch: 1,
            rate_limit_per_minute: 60,
            default_num_results: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!(config.enabled);
        assert_eq!(config.overfetch, 1);
        assert_eq!(config.default_num_results, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_rate_limit() {
        let config = SearchConfig {
            rate_limit_per_minute: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_default_results() {
        let config = SearchConfig {
            default_num_results: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_api_key_is_valid() {
        let config = SearchConfig {
            serp_api_key: None,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
