// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Speech transcript providers for video content
//!
//! Transcript fetching is a single attempt per extraction and does not
//! share the evaluator's retry budget; a failure here degrades the
//! extraction to metadata-only rather than failing it.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use super::classify::{youtube_video_id, VideoPlatform};

const TIMEDTEXT_URL: &str = "https://video.google.com/timedtext";
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Errors from transcript acquisition
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("transcript transport error: {0}")]
    Transport(String),

    #[error("no captions published for {0}")]
    NotAvailable(String),

    #[error("no transcript capability for {0}")]
    UnsupportedPlatform(String),
}

/// Trait for platform transcript providers
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Whether this provider can fetch transcripts for the platform
    fn supports(&self, platform: VideoPlatform) -> bool;

    /// Fetch a plain-text transcript for a video URL
    async fn fetch_transcript(&self, url: &str) -> Result<String, TranscriptError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// YouTube timed-text caption provider
///
/// Pulls the published caption track via the timedtext endpoint and strips
/// the XML wrapper. Only videos with published captions have one; absence
/// is reported as `NotAvailable`.
pub struct TimedTextProvider {
    client: Client,
    language: String,
}

impl TimedTextProvider {
    pub fn new(language: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, language }
    }
}

#[async_trait]
impl TranscriptProvider for TimedTextProvider {
    fn supports(&self, platform: VideoPlatform) -> bool {
        platform == VideoPlatform::YouTube
    }

    async fn fetch_transcript(&self, url: &str) -> Result<String, TranscriptError> {
        let video_id = youtube_video_id(url)
            .ok_or_else(|| TranscriptError::UnsupportedPlatform(url.to_string()))?;

        let response = self
            .client
            .get(TIMEDTEXT_URL)
            .query(&[("lang", self.language.as_str()), ("v", &video_id)])
            .send()
            .await
            .map_err(|e| TranscriptError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranscriptError::Transport(format!(
                "HTTP {} from timedtext endpoint",
                response.status().as_u16()
            )));
        }

        let xml = response
            .text()
            .await
            .map_err(|e| TranscriptError::Transport(e.to_string()))?;

        let transcript = timedtext_to_plain(&xml);
        if transcript.is_empty() {
            return Err(TranscriptError::NotAvailable(url.to_string()));
        }

        Ok(transcript)
    }

    fn name(&self) -> &'static str {
        "timedtext"
    }
}

/// Convert a timedtext XML document to plain transcript text
fn timedtext_to_plain(xml: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("static regex compiles"));

    let without_tags = tag_re.replace_all(xml, " ");
    let decoded = decode_entities(&without_tags);

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the entities the timedtext endpoint actually emits
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
