//! Scrape result records.
//!
//! Field names serialize camelCase so the JSON matches the wire format
//! consumed by webhook endpoints and the download capture file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single extracted post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Numeric id parsed from a permalink, or a deterministic content hash
    pub post_id: String,

    /// Post body text ("" when none was found)
    pub text: String,

    /// Author display name ("Unknown" when none was found)
    pub author: String,

    /// Post timestamp; falls back to scrape time when unparseable
    pub timestamp: DateTime<Utc>,

    /// Visible comment texts, in document order across markup variants
    pub comments: Vec<String>,

    /// Image URLs matching the content-domain allow-list
    pub images: Vec<String>,
}

impl Post {
    /// A post is worth keeping only if it carries some content.
    pub fn has_valid_content(&self) -> bool {
        !self.text.is_empty() || !self.comments.is_empty() || !self.images.is_empty()
    }
}

/// Aggregate statistics over the extracted posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMetadata {
    pub total_posts: usize,
    pub total_comments: usize,
    pub total_images: usize,

    /// Elapsed wall-clock time; rewritten once after webhook completion
    pub scraping_duration_ms: u64,
}

impl ScrapeMetadata {
    /// Compute totals from a post list, keeping the invariants
    /// `total_posts == posts.len()`, `total_comments == Σ comments`,
    /// `total_images == Σ images`.
    pub fn for_posts(posts: &[Post], scraping_duration_ms: u64) -> Self {
        Self {
            total_posts: posts.len(),
            total_comments: posts.iter().map(|p| p.comments.len()).sum(),
            total_images: posts.iter().map(|p| p.images.len()).sum(),
            scraping_duration_ms,
        }
    }
}

/// Group name and id extracted from the page and source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    pub id: String,
}

impl GroupInfo {
    pub fn unknown() -> Self {
        Self {
            name: "Unknown Group".to_string(),
            id: "unknown".to_string(),
        }
    }
}

/// The result envelope for one extraction.
///
/// Constructed fresh per invocation and never mutated afterwards, except
/// for `metadata.scraping_duration_ms` which the dispatcher rewrites once
/// after a successful webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// When the extraction completed
    pub timestamp: DateTime<Utc>,

    /// URL of the scraped page
    pub source_url: String,

    pub group_name: String,
    pub group_id: String,

    pub posts: Vec<Post>,
    pub metadata: ScrapeMetadata,
}

impl ScrapeResult {
    /// Build a result envelope, computing metadata from the posts.
    pub fn new(
        source_url: impl Into<String>,
        group: GroupInfo,
        posts: Vec<Post>,
        scraping_duration_ms: u64,
    ) -> Self {
        let metadata = ScrapeMetadata::for_posts(&posts, scraping_duration_ms);
        Self {
            timestamp: Utc::now(),
            source_url: source_url.into(),
            group_name: group.name,
            group_id: group.id,
            posts,
            metadata,
        }
    }

    /// Post-hoc structural check.
    ///
    /// Returns human-readable reasons; an empty list means the result is
    /// valid and may be handed to the dispatcher.
    pub fn validate(&self, group_url_pattern: &str) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.source_url.contains(group_url_pattern) {
            errors.push("Invalid group URL".to_string());
        }

        if self.posts.is_empty() {
            errors.push("No posts found to scrape".to_string());
        }

        errors
    }
}
