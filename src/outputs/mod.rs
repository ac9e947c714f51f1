//! Digest rendering for the email body.
//!
//! # Submodules
//!
//! - [`html`]: Filters and orders scored postings, assigns presentation
//!   tiers, and renders the HTML email document and its subject line
//!
//! The renderer is the only consumer of [`crate::models::ScoredPosting`];
//! everything it emits is a plain `String` handed to the notifier.

pub mod html;
