//! Index page link extraction
//!
//! The index page links to every content page of the crawl, mixed with links
//! to edit forms, files, templates, categories and special pages. This module
//! keeps only the content links, deduplicated by title in document order.

use crate::config::SiteConfig;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// A content page discovered on the index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Anchor title, used as the fallback display name
    pub title: String,

    /// Absolute URL of the detail page
    pub url: String,
}

/// Insertion-ordered set of titles seen during one crawl run
#[derive(Debug, Clone, Default)]
pub struct SeenTitles {
    order: Vec<String>,
    members: HashSet<String>,
}

impl SeenTitles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a title, returning false if it was already present
    pub fn insert(&mut self, title: &str) -> bool {
        if self.members.contains(title) {
            return false;
        }
        self.members.insert(title.to_string());
        self.order.push(title.to_string());
        true
    }

    pub fn contains(&self, title: &str) -> bool {
        self.members.contains(title)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Titles in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Extracts the ordered, deduplicated crawl targets from an index document
///
/// # Filter Rules
///
/// An anchor inside the index container is skipped when:
/// - it lacks an `href` or a `title` attribute
/// - its href does not contain the site's view-page pattern
/// - its title contains an excluded marker (edit, file, template, category, Special)
/// - its title was already seen earlier in the document
/// - its href cannot be resolved against the base URL
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use wiki_distill::config::SiteConfig;
/// use wiki_distill::crawler::extract_links;
///
/// let html = r#"<div id="mw-content-text">
///     <a href="/index.php?title=Imp" title="Imp">Imp</a>
/// </div>"#;
/// let site = SiteConfig {
///     base_url: "https://wiki.example.com".to_string(),
///     ..SiteConfig::default()
/// };
/// let targets = extract_links(&Html::parse_document(html), &site);
/// assert_eq!(targets[0].url, "https://wiki.example.com/index.php?title=Imp");
/// ```
pub fn extract_links(index: &Html, site: &SiteConfig) -> Vec<CrawlTarget> {
    let (container_selector, anchor_selector, base_url) = match (
        Selector::parse(&site.index_container),
        Selector::parse("a"),
        Url::parse(&site.base_url),
    ) {
        (Ok(container), Ok(anchor), Ok(base)) => (container, anchor, base),
        _ => {
            tracing::warn!("Index selectors or base URL are invalid, no links extracted");
            return Vec::new();
        }
    };

    let Some(container) = index.select(&container_selector).next() else {
        tracing::warn!(
            "Index container '{}' not found, no links extracted",
            site.index_container
        );
        return Vec::new();
    };

    let mut seen = SeenTitles::new();
    let mut targets = Vec::new();

    for anchor in container.select(&anchor_selector) {
        let element = anchor.value();
        let (Some(href), Some(title)) = (element.attr("href"), element.attr("title")) else {
            continue;
        };

        if !href.contains(&site.link_pattern) {
            continue;
        }

        if is_excluded_title(title, &site.excluded_title_markers) {
            tracing::debug!("Skipping meta-page link: {}", title);
            continue;
        }

        if seen.contains(title) {
            continue;
        }

        let url = match base_url.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Failed to resolve {}: {}", href, e);
                continue;
            }
        };

        seen.insert(title);
        targets.push(CrawlTarget {
            title: title.to_string(),
            url: url.to_string(),
        });
    }

    targets
}

/// Returns true if the title contains any of the excluded markers
pub fn is_excluded_title(title: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| title.contains(marker.as_str()))
}
