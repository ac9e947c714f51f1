//! RemoteOK job scraper.
//!
//! RemoteOK exposes a free public JSON API at `https://remoteok.com/api`,
//! which makes it the most reliable of the supported sources. Postings come
//! back with full HTML descriptions, so they skip the enrichment pass.
//!
//! # Payload Shape
//!
//! The endpoint returns a JSON array whose first element is a legal-notice
//! metadata object; real rows follow. Rows without a `position` are skipped.

use crate::models::{JobPosting, JobSource};
use crate::scrapers::{HTTP, MAX_RESULTS_PER_SOURCE};
use crate::utils::truncate_chars;
use chrono::{DateTime, Utc};
use scraper::Html;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument};

const API_URL: &str = "https://remoteok.com/api";
const MAX_DESCRIPTION_CHARS: usize = 2000;

/// One row of the RemoteOK API payload.
///
/// Every field is defaulted: the metadata row and the occasional sparse row
/// deserialize cleanly and are filtered out by the empty-`position` check.
#[derive(Debug, Deserialize)]
struct RemoteOkRow {
    #[serde(default)]
    position: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    salary: String,
    #[serde(default)]
    date: String,
}

/// Search RemoteOK for postings tagged with the given keywords.
///
/// Keywords are collapsed to a single dash-joined tag, matching the site's
/// tag URLs (`"software engineer"` → `software-engineer`).
#[instrument(level = "info", skip_all, fields(%keywords))]
pub async fn search_postings(keywords: &str) -> Result<Vec<JobPosting>, Box<dyn Error>> {
    let tag = keywords.trim().replace(' ', "-");
    let url = format!("{API_URL}?tag={}", urlencoding::encode(&tag));

    let body = HTTP.get(&url).send().await?.text().await?;
    let postings = parse_api_response(&body)?;

    info!(count = postings.len(), "Indexed RemoteOK postings");
    debug!(urls = ?postings.iter().map(|p| p.url.as_str()).collect::<Vec<_>>(), "RemoteOK URLs");
    Ok(postings)
}

/// Parse the API payload into postings.
fn parse_api_response(body: &str) -> Result<Vec<JobPosting>, Box<dyn Error>> {
    let rows: Vec<RemoteOkRow> = serde_json::from_str(body)?;

    let postings = rows
        .into_iter()
        .filter(|row| !row.position.is_empty())
        .take(MAX_RESULTS_PER_SOURCE)
        .map(posting_from_row)
        .collect::<Vec<_>>();

    Ok(postings)
}

fn posting_from_row(row: RemoteOkRow) -> JobPosting {
    let description = html_to_text(&row.description);
    let url = if row.url.is_empty() {
        format!("https://remoteok.com/remote-jobs/{}", row.id)
    } else {
        row.url
    };

    JobPosting {
        source: JobSource::RemoteOk,
        title: row.position,
        company: if row.company.is_empty() {
            "Unknown".to_string()
        } else {
            row.company
        },
        location: if row.location.is_empty() {
            "Remote".to_string()
        } else {
            row.location
        },
        url,
        description: (!description.is_empty())
            .then(|| truncate_chars(&description, MAX_DESCRIPTION_CHARS)),
        salary: (!row.salary.is_empty()).then_some(row.salary),
        posted_at: DateTime::parse_from_rfc3339(&row.date)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
    }
}

/// Flatten the row's HTML description to plain text.
fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"legal": "API terms of service apply."},
        {
            "id": "123",
            "position": "Rust Engineer",
            "company": "Acme",
            "location": "Worldwide",
            "description": "<p>Build <b>fast</b> systems.</p>",
            "url": "https://remoteok.com/remote-jobs/123",
            "salary": "$120k - $160k",
            "date": "2025-08-06T05:00:00+00:00"
        },
        {
            "id": "124",
            "position": "Platform Engineer",
            "company": "",
            "location": "",
            "description": "",
            "url": "",
            "salary": "",
            "date": "not-a-date"
        }
    ]"#;

    #[test]
    fn test_parse_skips_metadata_row() {
        let postings = parse_api_response(SAMPLE).unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].title, "Rust Engineer");
    }

    #[test]
    fn test_parse_flattens_description_html() {
        let postings = parse_api_response(SAMPLE).unwrap();
        assert_eq!(postings[0].description.as_deref(), Some("Build fast systems."));
    }

    #[test]
    fn test_parse_fills_defaults_for_sparse_rows() {
        let postings = parse_api_response(SAMPLE).unwrap();
        let sparse = &postings[1];
        assert_eq!(sparse.company, "Unknown");
        assert_eq!(sparse.location, "Remote");
        assert_eq!(sparse.url, "https://remoteok.com/remote-jobs/124");
        assert!(sparse.description.is_none());
        assert!(sparse.salary.is_none());
        assert!(sparse.posted_at.is_none());
    }

    #[test]
    fn test_parse_reads_salary_and_date() {
        let postings = parse_api_response(SAMPLE).unwrap();
        assert_eq!(postings[0].salary.as_deref(), Some("$120k - $160k"));
        assert!(postings[0].posted_at.is_some());
    }

    #[test]
    fn test_parse_caps_results() {
        let mut rows = vec!["{\"legal\": \"meta\"}".to_string()];
        for i in 0..40 {
            rows.push(format!(
                "{{\"id\": \"{i}\", \"position\": \"Job {i}\", \"company\": \"C\", \"url\": \"https://remoteok.com/remote-jobs/{i}\"}}"
            ));
        }
        let body = format!("[{}]", rows.join(","));
        let postings = parse_api_response(&body).unwrap();
        assert_eq!(postings.len(), MAX_RESULTS_PER_SOURCE);
    }

    #[test]
    fn test_parse_rejects_non_array_payload() {
        assert!(parse_api_response("{\"error\": \"rate limited\"}").is_err());
    }

    #[test]
    fn test_html_to_text_collapses_whitespace() {
        assert_eq!(
            html_to_text("<div><p>one</p>\n\n  <p>two</p></div>"),
            "one two"
        );
    }
}
