// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Keyword search module
//!
//! Obtains ranked URL/title/snippet triples for a keyword:
//! - SERP API provider when a key is configured, DuckDuckGo as keyless
//!   fallback, with automatic failover
//! - Rate limiting across providers
//! - Over-fetch compensation for provider undercounts, with any shortfall
//!   surfaced to the caller through `SearchMetadata`

pub mod config;
pub mod duckduckgo;
pub mod provider;
pub mod serpapi;
pub mod service;
pub mod types;

pub use config::SearchConfig;
pub use provider::SearchProvider;
pub use serpapi::SearchLocale;
pub use service::SearchService;
pub use types::{SearchError, SearchMetadata, SearchOutcome, SearchResultItem};
