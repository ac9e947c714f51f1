//! Description enrichment for postings scraped without one.
//!
//! The HTML sources list postings on search pages that carry no usable
//! description, so each one's detail page is fetched and the main text body
//! extracted: the source's known description selectors are tried first,
//! then the whole page body with chrome (`script`, `style`, `nav`,
//! `header`, `footer`) excluded.
//!
//! Enrichment fails soft. On any fetch or parse error the posting keeps its
//! empty description and proceeds to scoring with reduced context. Requests
//! run strictly in sequence with a politeness delay between them.

use crate::models::{JobPosting, JobSource};
use crate::scrapers::HTTP;
use crate::utils::truncate_chars;
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Node, Selector};
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Detail pages are fetched at most this often.
const POLITENESS_DELAY: Duration = Duration::from_secs(2);
/// Extracted descriptions are capped at this many characters.
const MAX_DESCRIPTION_CHARS: usize = 2500;

/// Elements whose subtrees never contain description text.
const SKIP_TAGS: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Fill in missing descriptions, one detail page at a time.
///
/// Postings that already have a description, or have no URL to fetch, pass
/// through untouched.
#[instrument(level = "info", skip_all)]
pub async fn enrich_missing_descriptions(postings: Vec<JobPosting>) -> Vec<JobPosting> {
    let total = postings.len();
    let enriched: Vec<JobPosting> = stream::iter(postings.into_iter().enumerate())
        .then(|(i, mut posting)| async move {
            let needs_description = posting
                .description
                .as_deref()
                .is_none_or(|d| d.is_empty());
            if !needs_description || posting.url.is_empty() {
                return posting;
            }

            debug!(
                index = i,
                total,
                title = %posting.title,
                company = %posting.company,
                "Fetching description"
            );
            sleep(POLITENESS_DELAY).await;

            match fetch_description(&posting.url, posting.source).await {
                Ok(Some(text)) => posting.description = Some(text),
                Ok(None) => {
                    warn!(url = %posting.url, "Detail page had no extractable text")
                }
                Err(e) => {
                    warn!(url = %posting.url, error = %e, "Description fetch failed; proceeding without")
                }
            }
            posting
        })
        .collect()
        .await;

    let filled = enriched
        .iter()
        .filter(|p| p.description.as_deref().is_some_and(|d| !d.is_empty()))
        .count();
    info!(total, with_description = filled, "Enrichment complete");
    enriched
}

/// Fetch one detail page and extract its description text.
async fn fetch_description(
    url: &str,
    source: JobSource,
) -> Result<Option<String>, Box<dyn Error>> {
    let html = HTTP.get(url).send().await?.text().await?;
    Ok(extract_description(&html, source))
}

/// Extract the description text from a detail page.
///
/// Tries the source's selectors in order, then falls back to body text with
/// [`SKIP_TAGS`] subtrees excluded.
pub fn extract_description(html: &str, source: JobSource) -> Option<String> {
    let document = Html::parse_document(html);

    for raw in source.detail_selectors() {
        let selector = match Selector::parse(raw) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if let Some(el) = document.select(&selector).next() {
            let text = collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                return Some(truncate_chars(&text, MAX_DESCRIPTION_CHARS));
            }
        }
    }

    // Fallback: whole body text, minus page chrome
    let body_selector = Selector::parse("body").ok()?;
    let body = document.select(&body_selector).next()?;
    let mut raw = String::new();
    collect_text_skipping(body, &mut raw);
    let text = collapse_whitespace(&raw);
    (!text.is_empty()).then(|| truncate_chars(&text, MAX_DESCRIPTION_CHARS))
}

/// Collect descendant text, skipping [`SKIP_TAGS`] subtrees entirely.
fn collect_text_skipping(el: ElementRef, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(element) => {
                if SKIP_TAGS.contains(&element.name()) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text_skipping(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_uses_source_selector_first() {
        let html = r#"
            <html><body>
              <nav>Jobs Home Login</nav>
              <div id="jobDescriptionText">Build distributed systems in Rust.</div>
            </body></html>"#;
        let text = extract_description(html, JobSource::Indeed).unwrap();
        assert_eq!(text, "Build distributed systems in Rust.");
    }

    #[test]
    fn test_extract_tries_selectors_in_order() {
        let html = r#"
            <html><body>
              <div class="show-more-less-html__markup">Second choice text.</div>
            </body></html>"#;
        let text = extract_description(html, JobSource::LinkedIn).unwrap();
        assert_eq!(text, "Second choice text.");
    }

    #[test]
    fn test_extract_falls_back_to_body_text() {
        let html = r#"
            <html><body>
              <script>var tracking = 1;</script>
              <style>.x { color: red }</style>
              <header>Site Header</header>
              <nav>Menu</nav>
              <main><p>We are hiring a Rust engineer.</p></main>
              <footer>Copyright</footer>
            </body></html>"#;
        let text = extract_description(html, JobSource::Indeed).unwrap();
        assert_eq!(text, "We are hiring a Rust engineer.");
    }

    #[test]
    fn test_extract_returns_none_for_empty_page() {
        assert!(extract_description("<html><body></body></html>", JobSource::Indeed).is_none());
    }

    #[test]
    fn test_extract_caps_length() {
        let html = format!("<html><body><p>{}</p></body></html>", "word ".repeat(2000));
        let text = extract_description(&html, JobSource::Indeed).unwrap();
        assert!(text.chars().count() <= MAX_DESCRIPTION_CHARS);
    }

    #[tokio::test]
    async fn test_enrich_skips_postings_with_description() {
        let postings = vec![JobPosting {
            source: JobSource::RemoteOk,
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            url: "https://example.invalid/job".to_string(),
            description: Some("Already enriched.".to_string()),
            salary: None,
            posted_at: None,
        }];
        let out = enrich_missing_descriptions(postings).await;
        assert_eq!(out[0].description.as_deref(), Some("Already enriched."));
    }

    #[tokio::test]
    async fn test_enrich_skips_postings_without_url() {
        let postings = vec![JobPosting {
            source: JobSource::Indeed,
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            url: String::new(),
            description: None,
            salary: None,
            posted_at: None,
        }];
        let out = enrich_missing_descriptions(postings).await;
        assert!(out[0].description.is_none());
    }
}
