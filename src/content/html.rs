// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML text and metadata extraction
//!
//! Converts raw HTML into bounded analyzable text: script/style blocks
//! removed, remaining markup stripped, whitespace collapsed, truncated to
//! the configured character budget on a word boundary.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

fn script_style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>")
            .expect("static regex compiles")
    })
}

/// Strip markup from an HTML document and bound the result
///
/// Script and style blocks are removed before parsing so their contents
/// never leak into the text.
pub fn strip_html(html: &str, max_chars: usize) -> String {
    let without_blocks = script_style_re().replace_all(html, " ");
    let document = Html::parse_document(&without_blocks);

    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    truncate_on_word(&collapse_whitespace(&text), max_chars)
}

/// Page title: Open Graph title first, then `<title>`
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if let Some(title) = meta_content(&document, "meta[property='og:title']") {
        return Some(title);
    }

    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

/// Page description: meta description first, then Open Graph description
pub fn page_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    meta_content(&document, "meta[name='description']")
        .or_else(|| meta_content(&document, "meta[property='og:description']"))
}

fn meta_content(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .filter(|c| !c.is_empty())
}

/// Collapse runs of whitespace into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to `max_chars`, preferring the last word boundary
pub fn truncate_on_word(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }

    // Back up to a char boundary before slicing
    let mut cut = max_chars;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }

    let truncated = &text[..cut];
    match truncated.rfind(' ') {
        Some(last_space) => format!("{}...", &text[..last_space]),
        None => format!("{}...", truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Diabetes treatment options</title>
            <meta name="description" content="How diabetes is treated and managed.">
            <meta property="og:title" content="Diabetes: treatment options">
            <style>body { color: red; }</style>
            <script>var tracker = "do not extract";</script>
        </head>
        <body>
            <h1>Treatment options</h1>
            <p>Insulin therapy   and lifestyle changes are the
            mainstays of diabetes management.</p>
            <script type="text/javascript">console.log("noise");</script>
        </body>
        </html>
    "#;

    #[test]
    fn test_strip_html_removes_markup_and_scripts() {
        let text = strip_html(SAMPLE_PAGE, 8000);
        assert!(text.contains("Treatment options"));
        assert!(text.contains("Insulin therapy and lifestyle changes"));
        assert!(!text.contains("do not extract"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("console.log"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_strip_html_respects_cap() {
        let text = strip_html(SAMPLE_PAGE, 30);
        assert!(text.len() <= 33); // cap + "..."
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_strip_html_empty_document() {
        assert!(strip_html("<html><body></body></html>", 8000).is_empty());
    }

    #[test]
    fn test_page_title_prefers_open_graph() {
        assert_eq!(
            page_title(SAMPLE_PAGE).as_deref(),
            Some("Diabetes: treatment options")
        );
    }

    #[test]
    fn test_page_title_falls_back_to_title_tag() {
        let html = "<html><head><title>  Plain title  </title></head></html>";
        assert_eq!(page_title(html).as_deref(), Some("Plain title"));
    }

    #[test]
    fn test_page_title_missing() {
        assert!(page_title("<html><body>No head</body></html>").is_none());
    }

    #[test]
    fn test_page_description() {
        assert_eq!(
            page_description(SAMPLE_PAGE).as_deref(),
            Some("How diabetes is treated and managed.")
        );
    }

    #[test]
    fn test_page_description_og_fallback() {
        let html = r#"<html><head>
            <meta property="og:description" content="OG only description.">
        </head></html>"#;
        assert_eq!(
            page_description(html).as_deref(),
            Some("OG only description.")
        );
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c  "), "a b c");
    }

    #[test]
    fn test_truncate_on_word_boundary() {
        let text = "This is a long text that needs to be truncated at word boundary";
        let truncated = truncate_on_word(text, 30);
        assert!(truncated.len() <= 33);
        assert!(truncated.ends_with("..."));
        assert!(!truncated.contains("truncated"));
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_on_word("Short text", 100), "Short text");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let text = "ação de saúde repetida muitas vezes para ultrapassar o limite";
        let truncated = truncate_on_word(text, 10);
        assert!(truncated.ends_with("..."));
    }
}
