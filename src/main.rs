//! # Job Match Digest
//!
//! A job search automation pipeline that scrapes postings from several job
//! boards, scores each one against the user's resume with Claude, and emails
//! a formatted HTML digest of the day's best matches.
//!
//! ## Usage
//!
//! ```sh
//! job_match_digest --keywords "rust engineer" --location Remote
//! ```
//!
//! Secrets (API key, mail credentials, resume text) come from the
//! environment; see [`cli::Cli`].
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture, strictly sequential:
//! 1. **Searching**: Collect postings from each job board
//! 2. **Deduplication**: Drop cross-posted duplicates by title + company
//! 3. **Enrichment**: Fetch missing descriptions from detail pages
//! 4. **Scoring**: Send each posting with the resume to the model
//! 5. **Digest**: Render the HTML report and submit it over SMTP
//!
//! A failed source or posting is logged and skipped; only a failed email
//! send aborts the run.

use clap::Parser;
use std::error::Error;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod enrich;
mod models;
mod notify;
mod outputs;
mod scorer;
mod scrapers;
mod utils;

use api::AnthropicClient;
use cli::Cli;
use models::{JobPosting, ScoredPosting};
use outputs::html;
use utils::{dedupe_postings, truncate_for_log};

/// Pause between scoring calls to stay under the API rate limits.
const SCORING_PAUSE: std::time::Duration = std::time::Duration::from_secs(1);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("job_match_digest starting up");

    // Parse CLI
    let args = Cli::parse();
    info!(
        keywords = %args.keywords,
        location = %args.location,
        min_match_score = args.min_match_score,
        "Run configuration"
    );

    // ---- Search all boards ----
    let remoteok_postings = recover(
        "RemoteOK",
        scrapers::remoteok::search_postings(&args.keywords).await,
    );
    let indeed_postings = recover(
        "Indeed",
        scrapers::indeed::search_postings(&args.keywords, &args.location).await,
    );
    let linkedin_postings = recover(
        "LinkedIn",
        scrapers::linkedin::search_postings(&args.keywords, &args.location).await,
    );

    let remoteok_count = remoteok_postings.len();
    let indeed_count = indeed_postings.len();
    let linkedin_count = linkedin_postings.len();

    let postings = vec![remoteok_postings, indeed_postings, linkedin_postings]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    info!(
        total = postings.len(),
        remoteok_count, indeed_count, linkedin_count, "Search completed"
    );

    // ---- Deduplicate ----
    let postings = dedupe_postings(postings);
    let total_scraped = postings.len();
    info!(total_unique = total_scraped, "Postings after deduplication");

    // ---- Enrich missing descriptions ----
    let postings = enrich::enrich_missing_descriptions(postings).await;

    // ---- Score each posting ----
    let client = AnthropicClient::new(args.anthropic_api_key.clone())?;
    let total_to_score = postings.len();
    info!(total = total_to_score, "Starting scoring");

    let mut scored: Vec<ScoredPosting> = Vec::with_capacity(total_to_score);
    for (i, posting) in postings.into_iter().enumerate() {
        info!(
            index = i + 1,
            total = total_to_score,
            title = %truncate_for_log(&posting.title, 80),
            company = %posting.company,
            "Analyzing posting"
        );
        let analysis =
            scorer::score_posting(&client, &args.resume_text, &args.keywords, &posting).await;
        tokio::time::sleep(SCORING_PAUSE).await;

        if analysis.score() >= args.min_match_score {
            info!(score = analysis.score(), "Posting passed the threshold");
        } else {
            info!(score = analysis.score(), "Below threshold; will be filtered");
        }
        scored.push(ScoredPosting { posting, analysis });
    }

    let qualifying_count = html::qualifying_postings(&scored, args.min_match_score).len();
    info!(
        qualifying = qualifying_count,
        total = total_to_score,
        "Scoring completed"
    );

    // ---- Render & send digest ----
    // Sent even when nothing qualified, so a quiet day is distinguishable
    // from a broken run.
    let digest = html::render_digest(&scored, args.min_match_score, total_scraped);
    let subject = html::subject_line(qualifying_count);

    info!(recipient = %args.your_email, "Sending digest email");
    if let Err(e) = notify::send_digest(
        &args.smtp_relay,
        &args.your_email,
        &args.gmail_app_password,
        &args.your_email,
        &subject,
        digest,
    )
    .await
    {
        error!(error = %e, "Digest email failed");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        qualifying = qualifying_count,
        total_scraped,
        "Execution complete"
    );

    Ok(())
}

/// Unwrap one source's search result, trading an error for an empty list.
///
/// A board being unreachable or changing its markup must not cost the run
/// the other boards' postings.
fn recover(source: &str, result: Result<Vec<JobPosting>, Box<dyn Error>>) -> Vec<JobPosting> {
    match result {
        Ok(postings) => postings,
        Err(e) => {
            warn!(%source, error = %e, "Source failed; continuing with zero postings");
            Vec::new()
        }
    }
}
