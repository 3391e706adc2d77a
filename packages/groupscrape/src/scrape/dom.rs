//! Selector-chain extraction over one page snapshot.
//!
//! Everything here is synchronous: `scraper::Html` is not `Send`, so the
//! session parses each snapshot inside a plain function call and only the
//! extracted records cross await points.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::traits::progress::ProgressSink;
use crate::types::config::SelectorConfig;
use crate::types::record::{GroupInfo, Post};

lazy_static! {
    /// First `/<digits>` run in a permalink-style href.
    static ref DIGIT_RUN: Regex = Regex::new(r"/(\d+)").unwrap();

    /// Numeric group id in a group-page URL.
    static ref GROUP_ID: Regex = Regex::new(r"groups/(\d+)").unwrap();
}

/// Outcome of extracting one snapshot that contained post containers.
pub(crate) struct SnapshotScrape {
    pub posts: Vec<Post>,
    pub group: GroupInfo,
    pub containers: usize,
}

/// Selector chains compiled once per snapshot.
///
/// Unparseable selectors are skipped with a warning so a bad entry in an
/// externally supplied config degrades that one chain, nothing else.
pub(crate) struct CompiledSelectors {
    containers: Vec<Selector>,
    post_id: Vec<Selector>,
    text: Vec<Selector>,
    comments: Vec<Selector>,
    timestamp: Vec<Selector>,
    author: Vec<Selector>,
    group_name: Vec<Selector>,
    images: Option<Selector>,
    image_domains: Vec<String>,
}

impl CompiledSelectors {
    pub fn compile(config: &SelectorConfig) -> Self {
        Self {
            containers: parse_chain(&config.containers),
            post_id: parse_chain(&config.post_id),
            text: parse_chain(&config.text),
            comments: parse_chain(&config.comments),
            timestamp: parse_chain(&config.timestamp),
            author: parse_chain(&config.author),
            group_name: parse_chain(&config.group_name),
            images: Selector::parse("img").ok(),
            image_domains: config.image_domains.clone(),
        }
    }
}

fn parse_chain(chain: &[String]) -> Vec<Selector> {
    chain
        .iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(_) => {
                warn!(selector = %raw, "skipping unparseable selector");
                None
            }
        })
        .collect()
}

/// Extract one snapshot, or `None` when no container strategy matched.
pub(crate) fn scrape_snapshot(
    html: &str,
    source_url: &str,
    config: &SelectorConfig,
    progress: &dyn ProgressSink,
) -> Option<SnapshotScrape> {
    let document = Html::parse_document(html);
    let selectors = CompiledSelectors::compile(config);

    let containers = find_containers(&document, &selectors.containers);
    if containers.is_empty() {
        return None;
    }

    let total = containers.len();
    debug!(containers = total, "post containers located");

    let mut posts = Vec::with_capacity(total);
    for (index, element) in containers.into_iter().enumerate() {
        let post = extract_post(element, &selectors);
        if post.has_valid_content() {
            posts.push(post);
        } else {
            debug!(index, "dropping post with no content");
        }
        progress.progress(&format!("Scraping post {}/{}", index + 1, total));
    }

    Some(SnapshotScrape {
        posts,
        group: extract_group_info(&document, &selectors, source_url),
        containers: total,
    })
}

/// Locate post containers: strategies are tried in order of reliability
/// and the first one yielding at least one match wins. No merging across
/// strategies, so a page matching an old and a new layout at once is read
/// through the more specific one only.
fn find_containers<'a>(document: &'a Html, strategies: &[Selector]) -> Vec<ElementRef<'a>> {
    for strategy in strategies {
        let matches: Vec<_> = document.select(strategy).collect();
        if !matches.is_empty() {
            return matches;
        }
    }
    Vec::new()
}

fn extract_post(element: ElementRef<'_>, selectors: &CompiledSelectors) -> Post {
    let full_text = element_text(element);

    Post {
        post_id: extract_post_id(element, selectors, &full_text),
        text: first_non_empty_text(element, &selectors.text).unwrap_or_default(),
        author: first_non_empty_text(element, &selectors.author)
            .unwrap_or_else(|| "Unknown".to_string()),
        timestamp: extract_timestamp(element, &selectors.timestamp),
        comments: extract_comments(element, &selectors.comments),
        images: extract_images(element, selectors),
    }
}

/// Permalink id, else a deterministic hash of the element's text content.
fn extract_post_id(
    element: ElementRef<'_>,
    selectors: &CompiledSelectors,
    full_text: &str,
) -> String {
    for selector in &selectors.post_id {
        let Some(anchor) = element.select(selector).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(captures) = DIGIT_RUN.captures(href) {
            return captures[1].to_string();
        }
    }

    content_hash_id(full_text)
}

/// Deterministic decimal id derived from text content.
///
/// Stable across repeated scrapes of unchanged content, which is the whole
/// point: a post without a permalink keeps the same id on every run.
pub fn content_hash_id(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix).to_string()
}

/// First selector whose first match carries non-empty trimmed text.
fn first_non_empty_text(element: ElementRef<'_>, chain: &[Selector]) -> Option<String> {
    for selector in chain {
        if let Some(found) = element.select(selector).next() {
            let text = element_text(found);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Comments are a union across all selectors, not a fallback chain:
/// several comment markup variants can appear on one post at once.
fn extract_comments(element: ElementRef<'_>, chain: &[Selector]) -> Vec<String> {
    let mut comments = Vec::new();
    for selector in chain {
        for found in element.select(selector) {
            let text = element_text(found);
            if !text.is_empty() {
                comments.push(text);
            }
        }
    }
    comments
}

/// Every `img` whose src matches the content-domain allow-list.
fn extract_images(element: ElementRef<'_>, selectors: &CompiledSelectors) -> Vec<String> {
    let Some(img) = &selectors.images else {
        return Vec::new();
    };

    element
        .select(img)
        .filter_map(|image| image.value().attr("src"))
        .filter(|src| {
            selectors
                .image_domains
                .iter()
                .any(|domain| src.contains(domain.as_str()))
        })
        .map(str::to_string)
        .collect()
}

/// First parseable instant from the timestamp chain; the raw value is the
/// `datetime` attribute, else the `title` attribute, else the text.
/// Unparseable candidates fall through, and no candidate at all falls
/// through to now.
fn extract_timestamp(element: ElementRef<'_>, chain: &[Selector]) -> DateTime<Utc> {
    for selector in chain {
        let Some(found) = element.select(selector).next() else {
            continue;
        };

        let raw = found
            .value()
            .attr("datetime")
            .or_else(|| found.value().attr("title"))
            .map(|attr| attr.trim().to_string())
            .filter(|attr| !attr.is_empty())
            .or_else(|| {
                let text = element_text(found);
                (!text.is_empty()).then_some(text)
            });

        if let Some(raw) = raw {
            if let Some(instant) = parse_instant(&raw) {
                return instant;
            }
            debug!(raw = %raw, "unparseable timestamp candidate");
        }
    }

    Utc::now()
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|_| DateTime::parse_from_rfc2822(raw).map(|instant| instant.with_timezone(&Utc)))
        .ok()
        .or_else(|| raw.parse::<DateTime<Utc>>().ok())
}

/// Group name from the document, group id from the source URL.
fn extract_group_info(
    document: &Html,
    selectors: &CompiledSelectors,
    source_url: &str,
) -> GroupInfo {
    let mut group = GroupInfo::unknown();

    for selector in &selectors.group_name {
        if let Some(found) = document.select(selector).next() {
            let text = element_text(found);
            if !text.is_empty() {
                group.name = text;
                break;
            }
        }
    }

    if let Some(captures) = GROUP_ID.captures(source_url) {
        group.id = captures[1].to_string();
    }

    group
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::progress::NullProgress;

    const GROUP_URL: &str = "https://www.facebook.com/groups/360024864273201";

    fn scrape(html: &str) -> SnapshotScrape {
        scrape_snapshot(html, GROUP_URL, &SelectorConfig::default(), &NullProgress)
            .expect("snapshot should contain containers")
    }

    #[test]
    fn test_container_strategy_order_first_match_wins() {
        // Both the post_container and role=article strategies would match;
        // only the more specific first strategy is used.
        let html = r#"
            <div data-testid="post_container"><div dir="auto">specific</div></div>
            <div role="article"><div dir="auto">generic one</div></div>
            <div role="article"><div dir="auto">generic two</div></div>
        "#;

        let result = scrape(html);
        assert_eq!(result.containers, 1);
        assert_eq!(result.posts.len(), 1);
        assert_eq!(result.posts[0].text, "specific");
    }

    #[test]
    fn test_no_containers_yields_none() {
        let html = "<html><body><p>nothing post-like here</p></body></html>";
        assert!(scrape_snapshot(html, GROUP_URL, &SelectorConfig::default(), &NullProgress).is_none());
    }

    #[test]
    fn test_text_fallback_chain() {
        let html = r#"
            <div role="article">
                <div dir="auto">fallback text</div>
                <div data-testid="post_message">preferred text</div>
            </div>
        "#;

        let result = scrape(html);
        assert_eq!(result.posts[0].text, "preferred text");
    }

    #[test]
    fn test_post_id_from_permalink_digits() {
        let html = r#"
            <div role="article">
                <a href="/groups/360024864273201/posts/987654321098765/">hello</a>
                <div dir="auto">body</div>
            </div>
        "#;

        let result = scrape(html);
        // First digit run in the href, not the post segment specifically.
        assert_eq!(result.posts[0].post_id, "360024864273201");
    }

    #[test]
    fn test_post_id_hash_fallback_is_deterministic() {
        let html = r#"<div role="article"><div dir="auto">no permalink here</div></div>"#;

        let first = scrape(html);
        let second = scrape(html);
        assert_eq!(first.posts[0].post_id, second.posts[0].post_id);
        assert!(first.posts[0].post_id.chars().all(|c| c.is_ascii_digit()));

        let other =
            scrape(r#"<div role="article"><div dir="auto">different content</div></div>"#);
        assert_ne!(first.posts[0].post_id, other.posts[0].post_id);
    }

    #[test]
    fn test_comments_union_across_variants() {
        let html = r#"
            <div role="article">
                <div dir="auto">body</div>
                <div aria-label="Comment">old layout comment</div>
                <div data-testid="comment">new layout comment</div>
                <div data-testid="comment">   </div>
            </div>
        "#;

        let result = scrape(html);
        assert_eq!(
            result.posts[0].comments,
            vec![
                "old layout comment".to_string(),
                "new layout comment".to_string()
            ]
        );
    }

    #[test]
    fn test_image_allow_list() {
        let html = r#"
            <div role="article">
                <div dir="auto">body</div>
                <img src="https://scontent-arn2-1.xx.fbcdn.net/v/t39/photo.jpg">
                <img src="https://tracker.adnet.example/pixel.gif">
            </div>
        "#;

        let result = scrape(html);
        assert_eq!(
            result.posts[0].images,
            vec!["https://scontent-arn2-1.xx.fbcdn.net/v/t39/photo.jpg".to_string()]
        );
    }

    #[test]
    fn test_timestamp_datetime_attribute() {
        let html = r#"
            <div role="article">
                <div dir="auto">body</div>
                <time datetime="2026-03-01T12:30:00+00:00">March 1</time>
            </div>
        "#;

        let result = scrape(html);
        assert_eq!(
            result.posts[0].timestamp,
            "2026-03-01T12:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_timestamp_unparseable_falls_through_to_now() {
        let html = r#"
            <div role="article">
                <div dir="auto">body</div>
                <time datetime="yesterday-ish">yesterday-ish</time>
            </div>
        "#;

        let before = Utc::now();
        let result = scrape(html);
        assert!(result.posts[0].timestamp >= before);
    }

    #[test]
    fn test_author_default_unknown() {
        let html = r#"<div role="article"><div dir="auto">anonymous body</div></div>"#;
        assert_eq!(scrape(html).posts[0].author, "Unknown");

        let with_author = r#"
            <div role="article">
                <a href="/profile.php?id=4"> Ada Lovelace </a>
                <div dir="auto">body</div>
            </div>
        "#;
        assert_eq!(scrape(with_author).posts[0].author, "Ada Lovelace");
    }

    #[test]
    fn test_group_info_from_page_and_url() {
        let html = r#"
            <h1> Rust Beginners </h1>
            <div role="article"><div dir="auto">body</div></div>
        "#;

        let result = scrape(html);
        assert_eq!(result.group.name, "Rust Beginners");
        assert_eq!(result.group.id, "360024864273201");

        let slug_url = "https://www.facebook.com/groups/rust-beginners";
        let result = scrape_snapshot(html, slug_url, &SelectorConfig::default(), &NullProgress)
            .expect("containers present");
        assert_eq!(result.group.id, "unknown");
    }

    #[test]
    fn test_retention_filter_scenario() {
        // Three post-like elements: image-only, empty, text-only.
        let html = r#"
            <div role="article">
                <img src="https://scontent.xx.fbcdn.net/v/t39/only-image.jpg">
            </div>
            <div role="article"></div>
            <div role="article"><div dir="auto">hello</div></div>
        "#;

        let result = scrape(html);
        assert_eq!(result.containers, 3);
        assert_eq!(result.posts.len(), 2);
        assert_eq!(result.posts[0].images.len(), 1);
        assert_eq!(result.posts[1].text, "hello");
    }

    #[test]
    fn test_invalid_selector_degrades_only_its_chain() {
        let config = SelectorConfig {
            text: vec!["!!not-a-selector".to_string(), r#"[dir="auto"]"#.to_string()],
            ..Default::default()
        };

        let html = r#"<div role="article"><div dir="auto">still found</div></div>"#;
        let result = scrape_snapshot(html, GROUP_URL, &config, &NullProgress)
            .expect("containers present");
        assert_eq!(result.posts[0].text, "still found");
    }
}
