// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Content acquisition module
//!
//! Converts a result URL into bounded analyzable text:
//! - Pure video-URL classification against fixed platform watch-path shapes
//! - HTML fetch-and-strip with a character budget for model input
//! - Video metadata plus speech transcript, degrading to metadata-only
//!   (with a note) when no transcript can be obtained

pub mod classify;
pub mod extractor;
pub mod html;
pub mod transcript;

pub use classify::{is_video_url, video_platform, youtube_video_id, VideoPlatform};
pub use extractor::{
    ContentConfig, ContentExtractor, ContentKind, ExtractedContent, ExtractionError,
    WebContentExtractor,
};
pub use transcript::{TimedTextProvider, TranscriptError, TranscriptProvider};
