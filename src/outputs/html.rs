//! HTML digest rendering.
//!
//! Turns the run's scored postings into the email body: postings below the
//! configured minimum score are dropped, survivors are ordered by
//! descending score, and each row carries a tier badge, the model's
//! analysis, and a suggested cover-letter opener. When nothing qualifies
//! the digest still renders with an empty-state row so the daily email is
//! sent regardless.
//!
//! All posting- and model-sourced text is escaped before interpolation.

use crate::models::ScoredPosting;
use chrono::Local;
use std::fmt::Write;

/// Select and order the postings that appear in the digest.
///
/// Drops postings whose clamped score is below `min_match_score` and sorts
/// the rest descending by score. The sort is stable, so postings with equal
/// scores keep their scrape order.
pub fn qualifying_postings(
    scored: &[ScoredPosting],
    min_match_score: u8,
) -> Vec<&ScoredPosting> {
    let mut qualifying: Vec<&ScoredPosting> = scored
        .iter()
        .filter(|s| s.score() >= min_match_score)
        .collect();
    qualifying.sort_by(|a, b| b.score().cmp(&a.score()));
    qualifying
}

/// Subject line for the digest email.
pub fn subject_line(match_count: usize) -> String {
    format!(
        "{} Job Matches Today — {}",
        match_count,
        Local::now().format("%b %d, %Y")
    )
}

/// Render the full HTML digest document.
///
/// `total_scraped` is the number of unique postings that went into scoring,
/// shown in the header alongside the qualifying count.
pub fn render_digest(
    scored: &[ScoredPosting],
    min_match_score: u8,
    total_scraped: usize,
) -> String {
    let qualifying = qualifying_postings(scored, min_match_score);
    let date_str = Local::now().format("%B %d, %Y").to_string();

    let mut rows = String::new();
    for s in &qualifying {
        write_row(&mut rows, s);
    }
    if rows.is_empty() {
        rows.push_str(
            r#"<tr><td colspan="4" style="padding:30px; text-align:center; color:#999;">
            No jobs matched your minimum score today. Try lowering the minimum match score.
        </td></tr>"#,
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family:Arial,sans-serif; background:#f5f6fa; margin:0; padding:20px;">
  <div style="max-width:960px; margin:0 auto; background:white; border-radius:12px; overflow:hidden; box-shadow:0 4px 20px rgba(0,0,0,0.1);">

    <!-- Header -->
    <div style="background:linear-gradient(135deg,#667eea,#764ba2); padding:35px 30px; text-align:center;">
      <h1 style="color:white; margin:0; font-size:28px;">Daily Job Match Report</h1>
      <p style="color:rgba(255,255,255,0.85); margin:10px 0 0;">{date_str} &nbsp;|&nbsp; {match_count} matches from {total_scraped} jobs scraped</p>
    </div>

    <!-- Table -->
    <div style="padding:20px;">
      <table style="width:100%; border-collapse:collapse;">
        <thead>
          <tr style="background:#f8f9fa;">
            <th style="padding:12px; text-align:left; color:#555; font-size:13px;">JOB</th>
            <th style="padding:12px; text-align:center; color:#555; font-size:13px;">MATCH</th>
            <th style="padding:12px; text-align:left; color:#555; font-size:13px;">ANALYSIS</th>
            <th style="padding:12px; text-align:left; color:#555; font-size:13px;">COVER LETTER HOOK</th>
          </tr>
        </thead>
        <tbody>{rows}</tbody>
      </table>
    </div>

    <!-- Footer -->
    <div style="padding:20px 30px; background:#f8f9fa; text-align:center; border-top:1px solid #eee;">
      <p style="color:#aaa; font-size:12px; margin:0;">
        Powered by Claude &nbsp;|&nbsp; Sources: RemoteOK, Indeed, LinkedIn
        &nbsp;|&nbsp; Runs daily at 5 AM UTC
      </p>
    </div>
  </div>
</body>
</html>"#,
        match_count = qualifying.len(),
    )
}

/// Append one posting's table row.
fn write_row(rows: &mut String, s: &ScoredPosting) {
    let tier = s.tier();
    let color = tier.color();
    let posting = &s.posting;
    let analysis = &s.analysis;

    let salary_line = posting
        .salary
        .as_deref()
        .map(|salary| {
            format!(
                r#"<br><span style="color:#27ae60;font-size:12px;">{}</span>"#,
                escape_html(salary)
            )
        })
        .unwrap_or_default();
    let posted_line = posting
        .posted_at
        .map(|d| {
            format!(
                r#"<br><span style="color:#7f8c8d;font-size:12px;">posted {}</span>"#,
                d.format("%Y-%m-%d")
            )
        })
        .unwrap_or_default();
    let missing_line = if analysis.missing_skills.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p style="margin:4px 0 0 0; color:#e74c3c;"><strong>Missing:</strong> {}</p>"#,
            escape_html(&analysis.missing_skills.join(", "))
        )
    };
    let matching_skills = if analysis.matching_skills.is_empty() {
        "N/A".to_string()
    } else {
        escape_html(&analysis.matching_skills.join(", "))
    };

    write!(
        rows,
        r#"
        <tr>
          <td style="padding:14px 12px; border-bottom:1px solid #eee; vertical-align:top;">
            <a href="{url}" style="font-weight:bold; font-size:15px; color:#2c3e50; text-decoration:none;">
              {title}
            </a><br>
            <span style="color:#7f8c8d; font-size:13px;">
              {company} &nbsp;|&nbsp; {location} &nbsp;|&nbsp; {source}
            </span>{salary_line}{posted_line}
          </td>
          <td style="padding:14px 12px; border-bottom:1px solid #eee; text-align:center; vertical-align:top; white-space:nowrap;">
            <div style="background:{color}; color:white; padding:6px 14px; border-radius:20px; font-weight:bold; font-size:16px; display:inline-block;">
              {score}%
            </div><br>
            <small style="color:{color}; font-weight:bold;">{tier_label}</small>
          </td>
          <td style="padding:14px 12px; border-bottom:1px solid #eee; font-size:13px; vertical-align:top;">
            <p style="margin:0 0 6px 0;">{rationale}</p>
            <p style="margin:0; color:#27ae60;"><strong>Skills:</strong> {matching_skills}</p>{missing_line}
          </td>
          <td style="padding:14px 12px; border-bottom:1px solid #eee; font-size:12px; color:#555; vertical-align:top; font-style:italic;">
            "{hook}"
          </td>
        </tr>"#,
        url = escape_html(&posting.url),
        title = escape_html(&posting.title),
        company = escape_html(&posting.company),
        location = escape_html(&posting.location),
        source = posting.source,
        score = s.score(),
        tier_label = tier.label(),
        rationale = escape_html(&analysis.rationale),
        hook = escape_html(&analysis.cover_letter_hook),
    )
    .unwrap();
}

/// Minimal HTML entity escaping for interpolated text.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobPosting, JobSource, MatchAnalysis, ScoredPosting};

    fn scored(title: &str, score: u8) -> ScoredPosting {
        ScoredPosting {
            posting: JobPosting {
                source: JobSource::RemoteOk,
                title: title.to_string(),
                company: "Acme".to_string(),
                location: "Remote".to_string(),
                url: format!("https://example.com/{title}"),
                description: Some("desc".to_string()),
                salary: None,
                posted_at: None,
            },
            analysis: MatchAnalysis {
                match_score: score,
                keyword_match: score,
                rationale: format!("Rationale for {title}."),
                matching_skills: vec!["Rust".to_string()],
                missing_skills: vec![],
                cover_letter_hook: "Opening line.".to_string(),
            },
        }
    }

    #[test]
    fn test_qualifying_drops_below_threshold() {
        let scored = vec![scored("a", 50), scored("b", 65), scored("c", 85)];
        let q = qualifying_postings(&scored, 65);
        assert_eq!(q.len(), 2);
        assert!(q.iter().all(|s| s.score() >= 65));
    }

    #[test]
    fn test_qualifying_sorted_descending() {
        let scored = vec![scored("low", 61), scored("high", 92), scored("mid", 75)];
        let q = qualifying_postings(&scored, 60);
        let scores: Vec<u8> = q.iter().map(|s| s.score()).collect();
        assert_eq!(scores, vec![92, 75, 61]);
    }

    #[test]
    fn test_qualifying_stable_for_equal_scores() {
        let scored = vec![scored("first", 70), scored("second", 70)];
        let q = qualifying_postings(&scored, 60);
        assert_eq!(q[0].posting.title, "first");
        assert_eq!(q[1].posting.title, "second");
    }

    #[test]
    fn test_render_excludes_filtered_postings() {
        let scored = vec![scored("Visible Job", 85), scored("Hidden Job", 50)];
        let html = render_digest(&scored, 65, 2);
        assert!(html.contains("Visible Job"));
        assert!(!html.contains("Hidden Job"));
    }

    #[test]
    fn test_render_ordering_non_increasing() {
        let scored = vec![scored("lower", 66), scored("upper", 90)];
        let html = render_digest(&scored, 60, 2);
        let upper_pos = html.find("upper").unwrap();
        let lower_pos = html.find("lower").unwrap();
        assert!(upper_pos < lower_pos);
    }

    #[test]
    fn test_render_tier_labels() {
        let html = render_digest(&[scored("strong", 85)], 60, 1);
        assert!(html.contains("Strong match"));
        assert!(html.contains("#27ae60"));

        let html = render_digest(&[scored("consider", 65)], 60, 1);
        assert!(html.contains("Consider applying"));
        assert!(html.contains("#f39c12"));
    }

    #[test]
    fn test_render_low_tier_when_threshold_admits() {
        let html = render_digest(&[scored("longshot", 45)], 40, 1);
        assert!(html.contains("longshot"));
        assert!(html.contains("Low match"));
        assert!(html.contains("#e74c3c"));
    }

    #[test]
    fn test_render_empty_state() {
        let html = render_digest(&[], 60, 0);
        assert!(html.contains("No jobs matched your minimum score today"));
        assert!(html.contains("0 matches from 0 jobs scraped"));
    }

    #[test]
    fn test_render_counts_in_header() {
        let scored = vec![scored("a", 85), scored("b", 30)];
        let html = render_digest(&scored, 60, 7);
        assert!(html.contains("1 matches from 7 jobs scraped"));
    }

    #[test]
    fn test_render_escapes_posting_fields() {
        let mut s = scored("Engineer <script>alert(1)</script>", 85);
        s.analysis.rationale = "Fits \"perfectly\" & more".to_string();
        let html = render_digest(&[s], 60, 1);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("Engineer &lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Fits &quot;perfectly&quot; &amp; more"));
    }

    #[test]
    fn test_render_salary_and_posted_lines() {
        let mut s = scored("Paid Job", 85);
        s.posting.salary = Some("$150k".to_string());
        s.posting.posted_at = Some(
            chrono::DateTime::parse_from_rfc3339("2025-08-06T05:00:00+00:00")
                .unwrap()
                .with_timezone(&chrono::Utc),
        );
        let html = render_digest(&[s], 60, 1);
        assert!(html.contains("$150k"));
        assert!(html.contains("posted 2025-08-06"));
    }

    #[test]
    fn test_render_missing_skills_only_when_present() {
        let mut s = scored("Job", 85);
        s.analysis.missing_skills = vec!["Kubernetes".to_string()];
        let html = render_digest(&[s], 60, 1);
        assert!(html.contains("Missing:"));
        assert!(html.contains("Kubernetes"));

        let html = render_digest(&[scored("Job", 85)], 60, 1);
        assert!(!html.contains("Missing:"));
    }

    #[test]
    fn test_subject_line_contains_count() {
        let subject = subject_line(4);
        assert!(subject.starts_with("4 Job Matches Today — "));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_html("it's \"ok\""), "it&#39;s &quot;ok&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
