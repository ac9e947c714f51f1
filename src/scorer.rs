//! Scoring of postings against the resume via the hosted model.
//!
//! One call is made per posting, sequentially. The model is instructed to
//! return a bare JSON object matching [`MatchAnalysis`]; this module strips
//! code fences, extracts the outermost JSON object from the response, and
//! parses it with per-field defaults. A response that fails to parse because
//! it was truncated is re-asked once. If the call or the parse still fails,
//! the posting is scored with [`MatchAnalysis::unavailable`] rather than
//! aborting the batch.

use crate::api::{AnthropicClient, ask_with_backoff};
use crate::models::{JobPosting, MatchAnalysis};
use crate::utils::{looks_truncated, truncate_chars, truncate_for_log};
use tracing::{info, instrument, warn};

/// Resume text is capped before prompting to bound request size.
const MAX_RESUME_CHARS: usize = 3500;
/// Description text is capped the same way.
const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Build the scoring prompt for one posting.
///
/// The model is told to answer with nothing but a JSON object whose keys
/// line up with [`MatchAnalysis`].
pub fn build_prompt(resume_text: &str, keywords: &str, posting: &JobPosting) -> String {
    let resume = truncate_chars(resume_text, MAX_RESUME_CHARS);
    let description = posting
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| truncate_chars(d, MAX_DESCRIPTION_CHARS))
        .unwrap_or_else(|| "Not available".to_string());

    format!(
        r#"You are an expert career advisor. Analyze this job posting against the candidate's resume and keywords.

## CANDIDATE RESUME:
{resume}

## TARGET KEYWORDS:
{keywords}

## JOB POSTING:
Title: {title}
Company: {company}
Location: {location}
Source: {source}
Description: {description}

## YOUR TASK:
Return ONLY a valid JSON object with NO markdown, NO backticks, NO explanation:

{{
  "match_score": <integer 0-100>,
  "keyword_match": <integer 0-100>,
  "rationale": "<2-3 sentence explanation>",
  "matching_skills": ["<skills from the resume that match>"],
  "missing_skills": ["<important skills the candidate may lack>"],
  "cover_letter_hook": "<one compelling opening sentence for a cover letter>"
}}"#,
        title = posting.title,
        company = posting.company,
        location = posting.location,
        source = posting.source,
    )
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Extract the outermost `{...}` span from a response.
///
/// Models occasionally wrap the object in prose despite instructions; the
/// span between the first `{` and the last `}` is what gets parsed.
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Parse a model response into a [`MatchAnalysis`].
pub fn parse_analysis(response: &str) -> Result<MatchAnalysis, serde_json::Error> {
    let cleaned = extract_json_object(strip_json_fences(response));
    serde_json::from_str::<MatchAnalysis>(cleaned)
}

/// Score one posting. Never fails: call and parse errors degrade to
/// [`MatchAnalysis::unavailable`] with a warning.
#[instrument(level = "info", skip_all, fields(title = %posting.title, company = %posting.company))]
pub async fn score_posting(
    client: &AnthropicClient,
    resume_text: &str,
    keywords: &str,
    posting: &JobPosting,
) -> MatchAnalysis {
    let prompt = build_prompt(resume_text, keywords, posting);

    let response = match ask_with_backoff(client, &prompt).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "Scoring call failed; marking posting unavailable");
            return MatchAnalysis::unavailable();
        }
    };

    let mut parsed = parse_analysis(&response);

    // If the parse failed due to EOF (truncation), re-ask ONCE
    if let Err(ref e) = parsed {
        if looks_truncated(e) {
            warn!(error = %e, "EOF while parsing; re-asking once");
            match ask_with_backoff(client, &prompt).await {
                Ok(r2) => {
                    parsed = parse_analysis(&r2);
                }
                Err(e2) => {
                    warn!(error = %e2, "Re-ask failed; marking posting unavailable");
                }
            }
        }
    }

    match parsed {
        Ok(analysis) => {
            info!(score = analysis.score(), "Scored posting");
            analysis
        }
        Err(e) => {
            warn!(
                error = %e,
                response_preview = %truncate_for_log(&response, 300),
                "Model returned non-conforming JSON; marking posting unavailable"
            );
            MatchAnalysis::unavailable()
        }
    }
}
