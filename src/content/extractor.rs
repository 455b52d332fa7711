// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multi-modal content extraction
//!
//! Turns a result URL into bounded analyzable text. Regular pages are
//! fetched and stripped to plain text; video URLs are resolved to page
//! metadata plus a speech transcript when a provider supports the
//! platform. Transcript failure degrades to metadata-only content with an
//! explanatory note instead of failing the extraction.

use async_trait::async_trait;
use reqwest::Client;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::{Host, Url};

use super::classify::video_platform;
use super::html::{page_description, page_title, strip_html, truncate_on_word};
use super::transcript::{TimedTextProvider, TranscriptProvider};

/// Kind of content an extraction produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Video,
}

/// Normalized analyzable content for one URL
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub url: String,
    /// Title taken from the page itself, when one was found
    pub title: Option<String>,
    /// Bounded plain text for the evaluator
    pub text: String,
    pub kind: ContentKind,
    /// Set when the extraction degraded (e.g. transcript unavailable)
    pub note: Option<String>,
}

/// Content extraction error taxonomy
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("transport failure fetching {url}: {message}")]
    Transport { url: String, message: String },

    #[error("timeout fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("unsupported content type {content_type} for {url}")]
    UnsupportedContentType { content_type: String, url: String },

    #[error("no analyzable text extracted from {url}")]
    EmptyContent { url: String },

    #[error("unsafe URL blocked: {url}")]
    UnsafeUrl { url: String },
}

/// Trait boundary the analysis pipeline depends on
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError>;
}

/// Configuration for content extraction
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Character budget for extracted text (bounds model input)
    pub max_chars: usize,
    /// Per-fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Client identity sent with every fetch
    pub user_agent: String,
    /// Caption language requested from transcript providers
    pub transcript_language: String,
}

impl ContentConfig {
    pub fn from_env() -> Self {
        Self {
            max_chars: env::var("CONTENT_MAX_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            fetch_timeout_secs: env::var("CONTENT_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            user_agent: env::var("CONTENT_USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string()
            }),
            transcript_language: env::var("TRANSCRIPT_LANGUAGE")
                .unwrap_or_else(|_| "pt".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_chars == 0 {
            return Err("Content character budget must be greater than 0".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("Fetch timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_chars: 8000,
            fetch_timeout_secs: 20,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            transcript_language: "pt".to_string(),
        }
    }
}

/// HTTP-backed extractor used in production
pub struct WebContentExtractor {
    client: Client,
    transcripts: Vec<Box<dyn TranscriptProvider>>,
    config: ContentConfig,
}

impl WebContentExtractor {
    pub fn new(config: ContentConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        let transcripts: Vec<Box<dyn TranscriptProvider>> = vec![Box::new(
            TimedTextProvider::new(config.transcript_language.clone()),
        )];

        Self {
            client,
            transcripts,
            config,
        }
    }

    /// Replace the transcript provider set (tests, alternative platforms)
    pub fn with_transcript_providers(
        mut self,
        transcripts: Vec<Box<dyn TranscriptProvider>>,
    ) -> Self {
        self.transcripts = transcripts;
        self
    }

    /// Check a URL is http(s) and does not target local or private hosts
    pub fn is_safe_url(url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }

        match parsed.host() {
            None => false,
            Some(Host::Domain(domain)) => !domain.eq_ignore_ascii_case("localhost"),
            Some(Host::Ipv4(ip)) => {
                !(ip.is_loopback()
                    || ip.is_private()
                    || ip.is_link_local()
                    || ip.is_unspecified())
            }
            Some(Host::Ipv6(ip)) => !(ip.is_loopback() || ip.is_unspecified()),
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<(String, String), ExtractionError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractionError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ExtractionError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.text().await.map_err(|e| ExtractionError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok((content_type, body))
    }

    async fn extract_page(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
        let (content_type, body) = self.fetch_page(url).await?;

        let is_html = content_type.contains("text/html")
            || content_type.contains("application/xhtml");
        if !is_html {
            return Err(ExtractionError::UnsupportedContentType {
                content_type: if content_type.is_empty() {
                    "unknown".to_string()
                } else {
                    content_type
                },
                url: url.to_string(),
            });
        }

        let text = strip_html(&body, self.config.max_chars);
        if text.is_empty() {
            return Err(ExtractionError::EmptyContent {
                url: url.to_string(),
            });
        }

        info!("Extracted {} chars from {}", text.len(), url);

        Ok(ExtractedContent {
            url: url.to_string(),
            title: page_title(&body),
            text,
            kind: ContentKind::Html,
            note: None,
        })
    }

    async fn extract_video(
        &self,
        url: &str,
        platform: super::classify::VideoPlatform,
    ) -> Result<ExtractedContent, ExtractionError> {
        // Watch-page metadata is independent of the video transport; a
        // failed metadata fetch degrades instead of failing the unit.
        let (title, description, mut note) = match self.fetch_page(url).await {
            Ok((_, body)) => (page_title(&body), page_description(&body), None),
            Err(e) => {
                warn!("Video metadata fetch failed for {}: {}", url, e);
                (None, None, Some(format!("page metadata unavailable: {}", e)))
            }
        };

        let mut sections = Vec::new();
        if let Some(ref t) = title {
            sections.push(format!("Title: {}", t));
        }
        if let Some(ref d) = description {
            sections.push(format!("Description: {}", d));
        }

        match self.transcripts.iter().find(|p| p.supports(platform)) {
            Some(provider) => match provider.fetch_transcript(url).await {
                Ok(transcript) => {
                    debug!(
                        "Transcript of {} chars from {} for {}",
                        transcript.len(),
                        provider.name(),
                        url
                    );
                    sections.push(format!("Transcript: {}", transcript));
                }
                Err(e) => {
                    warn!("Transcript fetch failed for {}: {}", url, e);
                    note = Some(merge_note(
                        note,
                        format!("transcript unavailable ({}); analysis based on page metadata only", e),
                    ));
                }
            },
            None => {
                note = Some(merge_note(
                    note,
                    format!(
                        "no transcript capability for {}; analysis based on page metadata only",
                        platform.label()
                    ),
                ));
            }
        }

        let text = truncate_on_word(&sections.join("\n"), self.config.max_chars);
        if text.is_empty() {
            return Err(ExtractionError::EmptyContent {
                url: url.to_string(),
            });
        }

        Ok(ExtractedContent {
            url: url.to_string(),
            title,
            text,
            kind: ContentKind::Video,
            note,
        })
    }
}

fn merge_note(existing: Option<String>, addition: String) -> String {
    match existing {
        Some(prior) => format!("{}; {}", prior, addition),
        None => addition,
    }
}

#[async_trait]
impl ContentExtractor for WebContentExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractionError> {
        if !Self::is_safe_url(url) {
            return Err(ExtractionError::UnsafeUrl {
                url: url.to_string(),
            });
        }

        debug!("Extracting content from {}", url);

        match video_platform(url) {
            Some(platform) => self.extract_video(url, platform).await,
            None => self.extract_page(url).await,
        }
    }
}
