//! LinkedIn job scraper.
//!
//! Scrapes the public (logged-out) jobs search page, restricted to postings
//! from the last 24 hours (`f_TPR=r86400`). Like Indeed, result cards carry
//! no description; the enrichment pass fetches detail pages afterwards.
//! Tracking query strings are stripped from card links.

use crate::models::{JobPosting, JobSource};
use crate::scrapers::{HTTP, MAX_RESULTS_PER_SOURCE};
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{info, instrument};

/// Search LinkedIn for postings matching the keywords and location.
#[instrument(level = "info", skip_all, fields(%keywords, %location))]
pub async fn search_postings(
    keywords: &str,
    location: &str,
) -> Result<Vec<JobPosting>, Box<dyn Error>> {
    let url = format!(
        "https://www.linkedin.com/jobs/search/?keywords={}&location={}&f_TPR=r86400&position=1&pageNum=0",
        urlencoding::encode(keywords),
        urlencoding::encode(location),
    );

    let html = HTTP.get(&url).send().await?.text().await?;
    let postings = parse_search_page(&html, location);

    info!(count = postings.len(), "Indexed LinkedIn postings");
    Ok(postings)
}

/// Parse a search results page into postings.
pub fn parse_search_page(html: &str, default_location: &str) -> Vec<JobPosting> {
    let document = Html::parse_document(html);

    let card_selector = Selector::parse(".jobs-search__results-list li, .base-card").unwrap();
    let title_selector =
        Selector::parse(".base-search-card__title, h3.base-search-card__title").unwrap();
    let company_selector =
        Selector::parse(".base-search-card__subtitle, a.hidden-nested-link").unwrap();
    let location_selector = Selector::parse(".job-search-card__location").unwrap();
    let link_selector =
        Selector::parse("a.base-card__full-link, a[href*='linkedin.com/jobs/view']").unwrap();

    let mut postings = Vec::new();
    for card in document
        .select(&card_selector)
        .take(MAX_RESULTS_PER_SOURCE)
    {
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
            .map(strip_query)
            .unwrap_or_default();

        postings.push(JobPosting {
            source: JobSource::LinkedIn,
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

/// Drop the tracking query string from a card link.
fn strip_query(href: &str) -> String {
    href.split('?').next().unwrap_or(href).to_string()
}
