// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Video URL classification
//!
//! Pure predicates over a fixed set of video-hosting URL shapes. No
//! network calls; classification only inspects the URL structure, so a
//! platform homepage or channel page never classifies as video.

use url::Url;

/// Video platforms recognized by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPlatform {
    YouTube,
    TikTok,
    Facebook,
}

impl VideoPlatform {
    pub fn label(&self) -> &'static str {
        match self {
            VideoPlatform::YouTube => "youtube",
            VideoPlatform::TikTok => "tiktok",
            VideoPlatform::Facebook => "facebook",
        }
    }
}

/// Classify a URL against the known video watch-path shapes
pub fn video_platform(url: &str) -> Option<VideoPlatform> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let host = normalized_host(&parsed)?;
    let path = parsed.path();

    match host.as_str() {
        "youtube.com" | "youtube-nocookie.com" => {
            let has_watch_id = path == "/watch" && query_param(&parsed, "v").is_some();
            if has_watch_id
                || path_has_id_segment(path, "/shorts/")
                || path_has_id_segment(path, "/embed/")
                || path_has_id_segment(path, "/live/")
            {
                return Some(VideoPlatform::YouTube);
            }
            None
        }
        "youtu.be" => {
            // Short links carry the video id as the whole path
            if path.len() > 1 {
                return Some(VideoPlatform::YouTube);
            }
            None
        }
        "tiktok.com" => {
            if path.contains("/video/") || path_has_id_segment(path, "/t/") {
                return Some(VideoPlatform::TikTok);
            }
            None
        }
        "vm.tiktok.com" => {
            if path.len() > 1 {
                return Some(VideoPlatform::TikTok);
            }
            None
        }
        "facebook.com" => {
            let has_watch_id = path.trim_end_matches('/') == "/watch"
                && query_param(&parsed, "v").is_some();
            if has_watch_id || path.contains("/videos/") || path_has_id_segment(path, "/reel/") {
                return Some(VideoPlatform::Facebook);
            }
            None
        }
        "fb.watch" => {
            if path.len() > 1 {
                return Some(VideoPlatform::Facebook);
            }
            None
        }
        _ => None,
    }
}

/// Whether a URL points at video content on a known platform
pub fn is_video_url(url: &str) -> bool {
    video_platform(url).is_some()
}

/// Extract the YouTube video id from any of the recognized URL shapes
pub fn youtube_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = normalized_host(&parsed)?;
    let path = parsed.path();

    match host.as_str() {
        "youtube.com" | "youtube-nocookie.com" => {
            if path == "/watch" {
                return query_param(&parsed, "v");
            }
            for prefix in ["/shorts/", "/embed/", "/live/"] {
                if let Some(rest) = path.strip_prefix(prefix) {
                    let id = rest.split('/').next().unwrap_or_default();
                    if !id.is_empty() {
                        return Some(id.to_string());
                    }
                }
            }
            None
        }
        "youtu.be" => {
            let id = path.trim_start_matches('/').split('/').next()?;
            if id.is_empty() {
                None
            } else {
                Some(id.to_string())
            }
        }
        _ => None,
    }
}

/// Host with the leading www./m. stripped, lowercased
fn normalized_host(parsed: &Url) -> Option<String> {
    let host = parsed.host_str()?.to_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host);
    Some(host.to_string())
}

fn query_param(parsed: &Url, name: &str) -> Option<String> {
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty())
}

/// True when `path` starts with `prefix` followed by a non-empty id
fn path_has_id_segment(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .map(|rest| !rest.is_empty() && !rest.starts_with('/'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_watch_urls() {
        assert_eq!(
            video_platform("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some(VideoPlatform::YouTube)
        );
        assert_eq!(
            video_platform("https://youtu.be/dQw4w9WgXcQ"),
            Some(VideoPlatform::YouTube)
        );
        assert_eq!(
            video_platform("https://m.youtube.com/shorts/abc123"),
            Some(VideoPlatform::YouTube)
        );
        assert_eq!(
            video_platform("https://www.youtube.com/embed/abc123"),
            Some(VideoPlatform::YouTube)
        );
    }

    #[test]
    fn test_youtube_non_video_urls() {
        assert_eq!(video_platform("https://www.youtube.com/"), None);
        assert_eq!(video_platform("https://www.youtube.com/watch"), None);
        assert_eq!(video_platform("https://www.youtube.com/@somechannel"), None);
        assert_eq!(video_platform("https://www.youtube.com/feed/trending"), None);
    }

    #[test]
    fn test_tiktok_urls() {
        assert_eq!(
            video_platform("https://www.tiktok.com/@user/video/7123456789"),
            Some(VideoPlatform::TikTok)
        );
        assert_eq!(
            video_platform("https://vm.tiktok.com/ZM8abcdef/"),
            Some(VideoPlatform::TikTok)
        );
        assert_eq!(video_platform("https://www.tiktok.com/@user"), None);
        assert_eq!(video_platform("https://www.tiktok.com/"), None);
    }

    #[test]
    fn test_facebook_urls() {
        assert_eq!(
            video_platform("https://www.facebook.com/watch?v=123456"),
            Some(VideoPlatform::Facebook)
        );
        assert_eq!(
            video_platform("https://www.facebook.com/somepage/videos/123456"),
            Some(VideoPlatform::Facebook)
        );
        assert_eq!(
            video_platform("https://www.facebook.com/reel/9876"),
            Some(VideoPlatform::Facebook)
        );
        assert_eq!(
            video_platform("https://fb.watch/abc123/"),
            Some(VideoPlatform::Facebook)
        );
        assert_eq!(video_platform("https://www.facebook.com/somepage"), None);
        assert_eq!(video_platform("https://www.facebook.com/watch"), None);
    }

    #[test]
    fn test_plain_pages_are_not_video() {
        assert!(!is_video_url("https://example.org/health/diabetes"));
        assert!(!is_video_url("https://www.nhs.uk/conditions/"));
        assert!(!is_video_url("not a url"));
    }

    #[test]
    fn test_youtube_video_id_extraction() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_video_id("https://youtu.be/abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            youtube_video_id("https://www.youtube.com/shorts/xyz789").as_deref(),
            Some("xyz789")
        );
        assert!(youtube_video_id("https://www.youtube.com/").is_none());
        assert!(youtube_video_id("https://www.tiktok.com/@user/video/1").is_none());
    }
}
