// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Assistant-API evaluation strategy
//!
//! Job-style model API: create a thread, post the payload, start a run,
//! poll the run status until it completes, then read back the newest
//! assistant message. The polling loop is bounded (poll interval x max
//! polls, roughly ten minutes at the defaults) so a stalled run fails
//! instead of hanging.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use super::error::EvaluationError;
use super::prompt::build_user_prompt;
use super::strategy::{EvaluationRequest, EvaluationStrategy};

/// Assistant-API strategy (preferred when an assistant id is configured)
pub struct AssistantStrategy {
    api_key: String,
    assistant_id: String,
    base_url: String,
    poll_interval: Duration,
    max_polls: u32,
    client: Client,
}

impl AssistantStrategy {
    pub fn new(
        api_key: String,
        assistant_id: String,
        base_url: String,
        poll_interval_secs: u64,
        max_polls: u32,
        request_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            assistant_id,
            base_url,
            poll_interval: Duration::from_secs(poll_interval_secs),
            max_polls,
            client,
        }
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, EvaluationError> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .json(&body)
            .send()
            .await
            .map_err(|e| EvaluationError::Transport(e.to_string()))
    }

    async fn get_json(&self, path: &str) -> Result<reqwest::Response, EvaluationError> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await
            .map_err(|e| EvaluationError::Transport(e.to_string()))
    }

    async fn wait_for_run(&self, thread_id: &str, run_id: &str) -> Result<(), EvaluationError> {
        for poll in 1..=self.max_polls {
            sleep(self.poll_interval).await;

            let response = self
                .get_json(&format!("/threads/{}/runs/{}", thread_id, run_id))
                .await?;
            let run: RunObject = decode(response).await?;

            debug!(
                "Evaluation run {} status {} (poll {}/{})",
                run_id, run.status, poll, self.max_polls
            );

            match run.status.as_str() {
                "completed" => return Ok(()),
                "failed" | "cancelled" | "expired" | "incomplete" => {
                    return Err(EvaluationError::RunIncomplete { status: run.status });
                }
                _ => continue, // queued, in_progress, requires_action
            }
        }

        Err(EvaluationError::PollBudgetExhausted {
            polls: self.max_polls,
        })
    }
}

#[async_trait]
impl EvaluationStrategy for AssistantStrategy {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError> {
        let thread: ThreadObject = decode(self.post_json("/threads", json!({})).await?).await?;

        let message_body = json!({
            "role": "user",
            "content": build_user_prompt(request),
        });
        let response = self
            .post_json(&format!("/threads/{}/messages", thread.id), message_body)
            .await?;
        ensure_success(response).await?;

        let run: RunObject = decode(
            self.post_json(
                &format!("/threads/{}/runs", thread.id),
                json!({ "assistant_id": self.assistant_id }),
            )
            .await?,
        )
        .await?;

        self.wait_for_run(&thread.id, &run.id).await?;

        let response = self
            .get_json(&format!(
                "/threads/{}/messages?order=desc&limit=10",
                thread.id
            ))
            .await?;
        let messages: MessageList = decode(response).await?;

        messages
            .data
            .into_iter()
            .find(|m| m.role == "assistant")
            .and_then(|m| {
                m.content
                    .into_iter()
                    .find_map(|c| c.text.map(|t| t.value))
            })
            .ok_or(EvaluationError::MalformedResponse)
    }

    fn name(&self) -> &'static str {
        "assistant"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty() && !self.assistant_id.is_empty()
    }

    fn priority(&self) -> u8 {
        10 // Preferred strategy
    }
}

/// Map a non-success status to an API error, otherwise decode the body
async fn decode<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, EvaluationError> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| EvaluationError::Transport(format!("response decode error: {}", e)))
}

async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, EvaluationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(EvaluationError::Api {
        status: status.as_u16(),
        message,
    })
}

#[derive(Debug, Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    role: String,
    content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(default)]
    text: Option<MessageText>,
}

#[derive(Debug, Deserialize)]
struct MessageText {
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(api_key: &str, assistant_id: &str) -> AssistantStrategy {
        AssistantStrategy::new(
            api_key.to_string(),
            assistant_id.to_string(),
            "https://api.openai.com/v1".to_string(),
            10,
            60,
            30,
        )
    }

    #[test]
    fn test_availability_requires_both_credentials() {
        assert!(strategy("key", "asst_1").is_available());
        assert!(!strategy("", "asst_1").is_available());
        assert!(!strategy("key", "").is_available());
    }

    #[test]
    fn test_priority_is_preferred() {
        assert_eq!(strategy("key", "asst_1").priority(), 10);
        assert_eq!(strategy("key", "asst_1").name(), "assistant");
    }

    #[test]
    fn test_run_object_deserialization() {
        let json = r#"{"id": "run_123", "status": "in_progress", "thread_id": "th_1"}"#;
        let run: RunObject = serde_json::from_str(json).unwrap();
        assert_eq!(run.id, "run_123");
        assert_eq!(run.status, "in_progress");
    }

    #[test]
    fn test_message_list_deserialization() {
        let json = r#"{
            "data": [
                {
                    "role": "assistant",
                    "content": [
                        {"type": "text", "text": {"value": "{\"totalScore\": 45}", "annotations": []}}
                    ]
                },
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": {"value": "analyze this"}}
                    ]
                }
            ]
        }"#;
        let messages: MessageList = serde_json::from_str(json).unwrap();
        let answer = messages
            .data
            .into_iter()
            .find(|m| m.role == "assistant")
            .and_then(|m| m.content.into_iter().find_map(|c| c.text.map(|t| t.value)))
            .unwrap();
        assert!(answer.contains("totalScore"));
    }

    #[test]
    fn test_message_content_without_text() {
        let json = r#"{"type": "image_file"}"#;
        let content: MessageContent = serde_json::from_str(json).unwrap();
        assert!(content.text.is_none());
    }
}
