//! Configuration for scrape sessions.
//!
//! Selector chains are data, not code: markup-drift fixes ship as a new
//! `SelectorConfig` (deserializable from JSON) without logic changes.

use serde::{Deserialize, Serialize};

/// Ordered CSS selector chains for every extracted field.
///
/// Each list is tried in order of specificity/reliability; the first
/// selector yielding usable content wins. Defaults cover the group-page
/// layouts observed in the wild.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorConfig {
    /// Strategies for locating post containers; first strategy with
    /// at least one match wins, no merging across strategies.
    pub containers: Vec<String>,

    /// Permalink-style anchors carrying a numeric post id in their href.
    pub post_id: Vec<String>,

    /// Post body text candidates.
    pub text: Vec<String>,

    /// Comment markup variants; matches are unioned, not fallback-chained,
    /// because several variants can appear on one post at once.
    pub comments: Vec<String>,

    /// Machine-readable timestamp carriers.
    pub timestamp: Vec<String>,

    /// Profile-link anchors naming the author.
    pub author: Vec<String>,

    /// Group name candidates, looked up document-wide.
    pub group_name: Vec<String>,

    /// Content-domain fragments an image src must contain to be kept.
    pub image_domains: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            containers: vec![
                r#"[data-testid="post_container"]"#.to_string(),
                r#"[data-ad-preview="message"]"#.to_string(),
                r#"div[role="article"]"#.to_string(),
                ".userContent".to_string(),
            ],
            post_id: vec![
                r#"[data-testid="post_id"]"#.to_string(),
                r#"a[href*="/permalink/"]"#.to_string(),
                r#"a[href*="/posts/"]"#.to_string(),
            ],
            text: vec![
                r#"[data-ad-preview="message"]"#.to_string(),
                r#"[data-testid="post_message"]"#.to_string(),
                ".userContent".to_string(),
                r#"[dir="auto"]"#.to_string(),
            ],
            comments: vec![
                r#"[aria-label="Comment"]"#.to_string(),
                r#"[data-testid="comment"]"#.to_string(),
                ".UFIReplyLink".to_string(),
            ],
            timestamp: vec![
                "time".to_string(),
                r#"[data-testid="post_timestamp"]"#.to_string(),
                "abbr[title]".to_string(),
            ],
            author: vec![
                r#"a[data-testid="post_author"]"#.to_string(),
                r#"a[href*="/profile.php"]"#.to_string(),
                r#"a[href*="/profile/"]"#.to_string(),
            ],
            group_name: vec![
                "h1".to_string(),
                r#"[data-testid="group_name"]"#.to_string(),
                ".groupHeaderName".to_string(),
            ],
            image_domains: vec![
                "scontent".to_string(),
                "fbcdn.net".to_string(),
                "facebook.com".to_string(),
            ],
        }
    }
}

/// Bounds for the content wait loop.
///
/// The wait polls container discovery on a fixed interval until a snapshot
/// yields at least one container, the attempt budget is spent, or the
/// wall-clock deadline passes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaitConfig {
    /// Delay between polling attempts in milliseconds.
    pub poll_interval_ms: u64,

    /// Wall-clock deadline in milliseconds; expiry fails with `Timeout`.
    pub timeout_ms: u64,

    /// Maximum snapshots to inspect; exhaustion fails with `NoContentFound`.
    pub max_attempts: usize,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            timeout_ms: 15_000,
            max_attempts: 30,
        }
    }
}

impl WaitConfig {
    /// Inspect a single snapshot and give up immediately.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Set the polling interval.
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the wall-clock deadline.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Set the attempt budget.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }
}

/// Configuration for a scrape session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrapeConfig {
    /// Substring the source URL must contain to count as a group page.
    pub group_url_pattern: String,

    /// Content wait bounds.
    pub wait: WaitConfig,

    /// Selector chains.
    pub selectors: SelectorConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            group_url_pattern: "facebook.com/groups/".to_string(),
            wait: WaitConfig::default(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl ScrapeConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the group-page URL pattern.
    pub fn with_group_url_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.group_url_pattern = pattern.into();
        self
    }

    /// Set the wait bounds.
    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Set the selector chains.
    pub fn with_selectors(mut self, selectors: SelectorConfig) -> Self {
        self.selectors = selectors;
        self
    }
}
