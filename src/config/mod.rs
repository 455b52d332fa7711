// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Application configuration
//!
//! Environment-derived configuration for every pipeline collaborator,
//! validated up front so missing credentials fail fast with a typed error
//! instead of deep inside a call chain.

use thiserror::Error;

use crate::content::ContentConfig;
use crate::evaluator::EvaluatorConfig;
use crate::pipeline::PipelineConfig;
use crate::search::SearchConfig;

/// Configuration errors surfaced before any work is accepted
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingKey(&'static str),

    #[error("invalid configuration for {section}: {reason}")]
    InvalidValue { section: &'static str, reason: String },
}

/// Composed configuration injected at pipeline construction time
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub content: ContentConfig,
    pub evaluator: EvaluatorConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        Self {
            search: SearchConfig::from_env(),
            content: ContentConfig::from_env(),
            evaluator: EvaluatorConfig::from_env(),
            pipeline: PipelineConfig::from_env(),
        }
    }

    /// Validate all sections, failing fast on the first problem
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluator.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::MissingKey("OPENAI_API_KEY"));
        }

        self.search
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                section: "search",
                reason,
            })?;
        self.content
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                section: "content",
                reason,
            })?;
        self.evaluator
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                section: "evaluator",
                reason,
            })?;

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            content: ContentConfig::default(),
            evaluator: EvaluatorConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_missing_api_key() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingKey("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_config_with_api_key_validates() {
        let config = AppConfig {
            evaluator: EvaluatorConfig {
                api_key: Some("sk-test".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_section_reported() {
        let mut config = AppConfig {
            evaluator: EvaluatorConfig {
                api_key: Some("sk-test".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        config.search.rate_limit_per_minute = 0;
        match config.validate() {
            Err(ConfigError::InvalidValue { section, .. }) => assert_eq!(section, "search"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }
}
