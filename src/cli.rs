//! Command-line interface definitions for the job match digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can be provided via command-line flag or environment
//! variable; the scheduled workflow supplies everything through the
//! environment. Configuration is read once at startup and not mutated for
//! the rest of the run.

use clap::Parser;

/// Command-line arguments for the job match digest.
///
/// # Examples
///
/// ```sh
/// # Everything from the environment (the scheduled-run setup)
/// job_match_digest
///
/// # Overriding the search on the command line
/// job_match_digest --keywords "rust engineer" --location "Berlin" --min-match-score 70
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search keywords sent to every job board
    #[arg(long, env = "JOB_KEYWORDS", default_value = "software engineer")]
    pub keywords: String,

    /// Search location sent to the location-aware boards
    #[arg(long, env = "JOB_LOCATION", default_value = "Remote")]
    pub location: String,

    /// Minimum match score (0-100) a posting needs to appear in the digest
    #[arg(long, env = "MIN_MATCH_SCORE", default_value_t = 60)]
    pub min_match_score: u8,

    /// Digest recipient; also used as the SMTP sender and username
    #[arg(long, env = "YOUR_EMAIL")]
    pub your_email: String,

    /// App password for the SMTP relay
    #[arg(long, env = "GMAIL_APP_PASSWORD", hide_env_values = true)]
    pub gmail_app_password: String,

    /// API key for the scoring model
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: String,

    /// Resume as plain text, matched against each posting
    #[arg(long, env = "RESUME_TEXT", hide_env_values = true)]
    pub resume_text: String,

    /// SMTP relay host for digest submission
    #[arg(long, env = "SMTP_RELAY", default_value = "smtp.gmail.com")]
    pub smtp_relay: String,
}
