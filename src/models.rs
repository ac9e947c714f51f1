//! Data models for job postings and their scored representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`JobPosting`]: Raw posting data as collected from a job board
//! - [`MatchAnalysis`]: LLM-produced match assessment with documented defaults
//! - [`ScoredPosting`]: A posting paired with its analysis, ready for rendering
//! - [`Tier`]: Presentation bucket derived from the match score
//!
//! The analysis fields use serde defaults so that a model response missing
//! any of them degrades to a usable value instead of failing the batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A job board the application knows how to search.
///
/// The enricher uses [`JobSource::detail_selectors`] to pull the main text
/// body out of each board's detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobSource {
    /// RemoteOK's public JSON API.
    RemoteOk,
    /// Indeed search result pages.
    Indeed,
    /// LinkedIn public jobs search pages.
    LinkedIn,
}

impl JobSource {
    /// CSS selectors for the description body on this source's detail pages,
    /// tried in order before falling back to whole-page text.
    pub fn detail_selectors(&self) -> &'static [&'static str] {
        match self {
            JobSource::RemoteOk => &[".description"],
            JobSource::Indeed => &["#jobDescriptionText", ".jobsearch-jobDescriptionText"],
            JobSource::LinkedIn => &[".description__text", ".show-more-less-html__markup"],
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobSource::RemoteOk => "RemoteOK",
            JobSource::Indeed => "Indeed",
            JobSource::LinkedIn => "LinkedIn",
        };
        write!(f, "{label}")
    }
}

/// A raw job posting as collected from a job board.
///
/// Fields are best effort: the HTML-scraped sources usually leave
/// `description` empty (filled in later by the enricher) and rarely carry
/// `salary` or `posted_at`. A posting is not mutated once it has been scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// The board this posting came from.
    pub source: JobSource,
    /// The job title/headline.
    pub title: String,
    /// The hiring company, `"Unknown"` when the board omits it.
    pub company: String,
    /// Location text as presented by the board.
    pub location: String,
    /// Link to the posting's detail page. May be empty when scraping failed
    /// to resolve one; such postings are scored without enrichment.
    pub url: String,
    /// Full text description, if already known.
    pub description: Option<String>,
    /// Salary text, when the board provides one.
    pub salary: Option<String>,
    /// Publication timestamp, when the board provides one.
    pub posted_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    /// Case-insensitive identity used for cross-source deduplication.
    pub fn dedupe_key(&self) -> (String, String) {
        (self.title.to_lowercase(), self.company.to_lowercase())
    }
}

/// The model's structured assessment of a posting against the resume.
///
/// This is the explicit result type for the scoring response. Every field
/// has a serde default so a response that omits one still deserializes:
/// scores default to 0, the rationale to `"unavailable"`, and the skill
/// lists to empty. [`MatchAnalysis::unavailable`] covers the case where the
/// call or the parse failed outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchAnalysis {
    /// Overall resume-to-job fit, 0-100. Clamp with [`MatchAnalysis::score`].
    #[serde(default)]
    pub match_score: u8,
    /// How well the posting matches the configured search keywords, 0-100.
    #[serde(default)]
    pub keyword_match: u8,
    /// Short explanation of the score.
    #[serde(default = "rationale_unavailable")]
    pub rationale: String,
    /// Skills from the resume that the posting asks for.
    #[serde(default)]
    pub matching_skills: Vec<String>,
    /// Skills the posting asks for that the resume does not show.
    #[serde(default)]
    pub missing_skills: Vec<String>,
    /// One suggested opening sentence for a cover letter.
    #[serde(default)]
    pub cover_letter_hook: String,
}

fn rationale_unavailable() -> String {
    "unavailable".to_string()
}

impl MatchAnalysis {
    /// Fallback analysis used when the model call or parse fails.
    pub fn unavailable() -> Self {
        MatchAnalysis {
            match_score: 0,
            keyword_match: 0,
            rationale: rationale_unavailable(),
            matching_skills: Vec::new(),
            missing_skills: Vec::new(),
            cover_letter_hook: String::new(),
        }
    }

    /// The match score clamped to the documented 0-100 range.
    pub fn score(&self) -> u8 {
        self.match_score.min(100)
    }
}

/// Presentation bucket derived from the match score.
///
/// Tiers only affect how a posting is rendered. Whether a posting appears at
/// all is decided by the configured minimum score, so a `LowMatch` posting
/// still renders when the threshold admits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Score 80 and above.
    StrongMatch,
    /// Score 60 through 79.
    ConsiderApplying,
    /// Score below 60.
    LowMatch,
}

impl Tier {
    /// Derive the tier from a clamped score.
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Tier::StrongMatch
        } else if score >= 60 {
            Tier::ConsiderApplying
        } else {
            Tier::LowMatch
        }
    }

    /// Label shown under the score badge.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::StrongMatch => "Strong match",
            Tier::ConsiderApplying => "Consider applying",
            Tier::LowMatch => "Low match",
        }
    }

    /// Badge color for the digest table.
    pub fn color(&self) -> &'static str {
        match self {
            Tier::StrongMatch => "#27ae60",
            Tier::ConsiderApplying => "#f39c12",
            Tier::LowMatch => "#e74c3c",
        }
    }
}

/// A posting paired with its match analysis.
///
/// Produced by the scorer, consumed only by the digest renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPosting {
    pub posting: JobPosting,
    pub analysis: MatchAnalysis,
}

impl ScoredPosting {
    /// The clamped 0-100 match score.
    pub fn score(&self) -> u8 {
        self.analysis.score()
    }

    /// The presentation tier for this posting.
    pub fn tier(&self) -> Tier {
        Tier::from_score(self.score())
    }
}
