//! Utility functions for string truncation, JSON error detection, and
//! posting deduplication.

use crate::models::JobPosting;
use itertools::Itertools;
use tracing::debug;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte
/// count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}

/// Truncate a string to at most `max` characters, respecting char boundaries.
///
/// Used to cap description and resume text before building prompts and
/// digest rows. Unlike [`truncate_for_log`] this is safe for arbitrary
/// UTF-8 content and adds no suffix.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// When the model response is cut off (e.g., due to token limits), the
/// resulting JSON will fail to parse with an EOF error. This function
/// helps identify such cases for the single re-ask.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Remove duplicate postings by case-insensitive title + company.
///
/// Boards cross-post the same role; the first occurrence wins so source
/// ordering in the merge decides which copy is scored.
pub fn dedupe_postings(postings: Vec<JobPosting>) -> Vec<JobPosting> {
    let before = postings.len();
    let unique = postings
        .into_iter()
        .unique_by(|p| p.dedupe_key())
        .collect::<Vec<JobPosting>>();
    debug!(before, after = unique.len(), "Deduplicated postings");
    unique
}
