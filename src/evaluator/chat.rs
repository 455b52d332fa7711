// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat-completions evaluation strategy
//!
//! Single-request fallback: system framing plus user payload in one POST,
//! first choice text back. Used when no assistant is configured or the
//! assistant strategy has failed.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::error::EvaluationError;
use super::prompt::{build_user_prompt, SYSTEM_PROMPT};
use super::strategy::{EvaluationRequest, EvaluationStrategy};

/// Chat-completions strategy
pub struct ChatStrategy {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl ChatStrategy {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        request_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            model,
            base_url,
            client,
        }
    }
}

#[async_trait]
impl EvaluationStrategy for ChatStrategy {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError> {
        let body = json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_user_prompt(request) },
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EvaluationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EvaluationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| EvaluationError::Transport(format!("response decode error: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(EvaluationError::MalformedResponse)
    }

    fn name(&self) -> &'static str {
        "chat"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn priority(&self) -> u8 {
        50 // Fallback strategy
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(api_key: &str) -> ChatStrategy {
        ChatStrategy::new(
            api_key.to_string(),
            "gpt-4o-mini".to_string(),
            "https://api.openai.com/v1".to_string(),
            60,
        )
    }

    #[test]
    fn test_availability_requires_api_key() {
        assert!(strategy("key").is_available());
        assert!(!strategy("").is_available());
    }

    #[test]
    fn test_fallback_priority() {
        assert_eq!(strategy("key").priority(), 50);
        assert_eq!(strategy("key").name(), "chat");
    }

    #[test]
    fn test_completion_deserialization() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "{\"totalScore\": 45}"}}
            ]
        }"#;
        let completion: ChatCompletion = serde_json::from_str(json).unwrap();
        assert_eq!(completion.choices.len(), 1);
        assert!(completion.choices[0].message.content.contains("totalScore"));
    }

    #[test]
    fn test_completion_empty_choices() {
        let completion: ChatCompletion = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(completion.choices.is_empty());
    }
}
