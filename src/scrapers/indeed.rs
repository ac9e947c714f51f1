//! Indeed job scraper.
//!
//! Scrapes the public search results page, restricted to postings from the
//! last 24 hours (`fromage=1`). Result cards carry title, company, and
//! location but no usable description; those are filled in by the
//! enrichment pass against each posting's detail page.

use crate::models::{JobPosting, JobSource};
use crate::scrapers::{HTTP, MAX_RESULTS_PER_SOURCE};
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{info, instrument, warn};
use url::Url;

const BASE_URL: &str = "https://indeed.com";

/// Search Indeed for postings matching the keywords and location.
#[instrument(level = "info", skip_all, fields(%keywords, %location))]
pub async fn search_postings(
    keywords: &str,
    location: &str,
) -> Result<Vec<JobPosting>, Box<dyn Error>> {
    let url = format!(
        "https://www.indeed.com/jobs?q={}&l={}&fromage=1",
        urlencoding::encode(keywords),
        urlencoding::encode(location),
    );

    let html = HTTP.get(&url).send().await?.text().await?;
    let postings = parse_search_page(&html, location);

    info!(count = postings.len(), "Indexed Indeed postings");
    Ok(postings)
}

/// Parse a search results page into postings.
///
/// Cards without a title are skipped. `default_location` stands in when a
/// card has no location element.
pub fn parse_search_page(html: &str, default_location: &str) -> Vec<JobPosting> {
    let document = Html::parse_document(html);

    let card_selector = Selector::parse(".job_seen_beacon").unwrap();
    let fallback_selector = Selector::parse("[data-jk]").unwrap();
    let title_selector = Selector::parse(".jobTitle span, h2.jobTitle").unwrap();
    let company_selector =
        Selector::parse(".companyName, [data-testid='company-name']").unwrap();
    let location_selector =
        Selector::parse(".companyLocation, [data-testid='text-location']").unwrap();
    let link_selector = Selector::parse("a[href*='/rc/clk'], a[id*='job_']").unwrap();

    let mut cards: Vec<ElementRef> = document.select(&card_selector).collect();
    if cards.is_empty() {
        cards = document.select(&fallback_selector).collect();
    }

    let mut postings = Vec::new();
    for card in cards.into_iter().take(MAX_RESULTS_PER_SOURCE) {
        let title = match first_text(&card, &title_selector) {
            Some(t) => t,
            None => continue,
        };
        let company =
            first_text(&card, &company_selector).unwrap_or_else(|| "Unknown".to_string());
        let location = first_text(&card, &location_selector)
            .unwrap_or_else(|| default_location.to_string());
        let url = card
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(resolve_href)
            .unwrap_or_default();
        if url.is_empty() {
            warn!(%title, "Indeed card had no usable link");
        }

        postings.push(JobPosting {
            source: JobSource::Indeed,
            title,
            company,
            location,
            url,
            description: None,
            salary: None,
            posted_at: None,
        });
    }

    postings
}

fn first_text(card: &ElementRef, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(|el| {
        el.text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
    .filter(|t| !t.is_empty())
}

/// Resolve a card link against the site root; absolute hrefs pass through.
fn resolve_href(href: &str) -> String {
    if href.starts_with('/') {
        Url::parse(BASE_URL)
            .and_then(|base| base.join(href))
            .map(|u| u.to_string())
            .unwrap_or_default()
    } else {
        href.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html><body>
          <div class="job_seen_beacon">
            <h2 class="jobTitle"><span>Senior Rust Engineer</span></h2>
            <span class="companyName">Acme Corp</span>
            <div class="companyLocation">Austin, TX</div>
            <a href="/rc/clk?jk=abc123">view</a>
          </div>
          <div class="job_seen_beacon">
            <span class="companyName">Shady Co</span>
          </div>
          <div class="job_seen_beacon">
            <h2 class="jobTitle"><span>Platform Engineer</span></h2>
            <a id="job_xyz" href="https://example.com/job/xyz">view</a>
          </div>
        </body></html>"#;

    #[test]
    fn test_parse_extracts_card_fields() {
        let postings = parse_search_page(SAMPLE, "Remote");
        assert_eq!(postings[0].title, "Senior Rust Engineer");
        assert_eq!(postings[0].company, "Acme Corp");
        assert_eq!(postings[0].location, "Austin, TX");
        assert_eq!(postings[0].url, "https://indeed.com/rc/clk?jk=abc123");
        assert_eq!(postings[0].source, JobSource::Indeed);
    }

    #[test]
    fn test_parse_skips_cards_without_title() {
        let postings = parse_search_page(SAMPLE, "Remote");
        assert_eq!(postings.len(), 2);
        assert!(postings.iter().all(|p| p.company != "Shady Co"));
    }

    #[test]
    fn test_parse_defaults_location_and_keeps_absolute_links() {
        let postings = parse_search_page(SAMPLE, "Remote");
        assert_eq!(postings[1].location, "Remote");
        assert_eq!(postings[1].url, "https://example.com/job/xyz");
    }

    #[test]
    fn test_parse_falls_back_to_data_jk_cards() {
        let html = r#"
            <div data-jk="1">
              <h2 class="jobTitle"><span>Fallback Engineer</span></h2>
              <div data-testid="company-name">Globex</div>
              <div data-testid="text-location">Berlin</div>
            </div>"#;
        let postings = parse_search_page(html, "Remote");
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Fallback Engineer");
        assert_eq!(postings[0].company, "Globex");
        assert_eq!(postings[0].location, "Berlin");
        assert!(postings[0].url.is_empty());
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_search_page("<html></html>", "Remote").is_empty());
    }

    #[test]
    fn test_parse_caps_results() {
        let card = r#"
            <div class="job_seen_beacon">
              <h2 class="jobTitle"><span>Job</span></h2>
              <a href="/rc/clk?jk=1">view</a>
            </div>"#;
        let html = card.repeat(30);
        assert_eq!(parse_search_page(&html, "Remote").len(), MAX_RESULTS_PER_SOURCE);
    }
}
