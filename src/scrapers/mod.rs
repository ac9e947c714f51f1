//! Job board scrapers for collecting postings from various sources.
//!
//! This module contains submodules for searching different job boards.
//! Each scraper exposes a `search_postings` entry point returning raw
//! [`crate::models::JobPosting`]s for the configured keywords/location.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | RemoteOK | [`remoteok`] | Public JSON API | Most reliable source; descriptions included |
//! | Indeed | [`indeed`] | HTML scraping | Last-24h search results; descriptions enriched later |
//! | LinkedIn | [`linkedin`] | HTML scraping | Public jobs search; descriptions enriched later |
//!
//! # Common Patterns
//!
//! Scrapers use:
//! - A shared HTTP client with a browser User-Agent (boards block default agents)
//! - Pure `parse_*` functions over response bodies, kept separate from fetching
//! - Graceful error handling: a malformed card is skipped, a failed source
//!   is caught by the caller and contributes zero postings

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

pub mod indeed;
pub mod linkedin;
pub mod remoteok;

/// Browser User-Agent sent with every scrape request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// At most this many postings are taken from each source per run.
pub const MAX_RESULTS_PER_SOURCE: usize = 20;

/// Shared HTTP client for all board requests (search and detail pages).
pub static HTTP: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(15))
        .build()
        .expect("failed to build HTTP client")
});
