// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for keyword search

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single ranked search result
///
/// `ranking` starts at 1 and is the display and processing order.
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    /// Position in the result list, starting at 1
    pub ranking: u32,
    /// Title of the search result
    pub title: String,
    /// Absolute URL of the search result
    pub url: String,
    /// Snippet/description of the search result
    pub snippet: String,
}

/// Metadata about how a search request was satisfied
///
/// The provider may return fewer results than requested; that shortfall is
/// surfaced here as a message for the caller, never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    /// Number of results the caller asked for
    pub requested: usize,
    /// Number actually requested upstream after over-fetch compensation
    pub adjusted: usize,
    /// Number the provider returned
    pub received: usize,
    /// Number returned to the caller after truncation
    pub returned: usize,
    /// Human-readable summary of any shortfall
    pub message: String,
}

/// Results plus metadata from one search call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<SearchResultItem>,
    pub metadata: SearchMetadata,
}

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Rate limited locally or by the search provider
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// API error from the search provider
    #[error("Search API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Search request timed out
    #[error("Search timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// No provider could satisfy the request
    #[error("Provider unavailable: {provider}")]
    ProviderUnavailable { provider: String },

    /// No API key configured for the provider
    #[error("No API key configured for {provider}")]
    NoApiKey { provider: String },

    /// Invalid search query
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Search is disabled by configuration
    #[error("Search disabled by configuration")]
    SearchDisabled,
}
