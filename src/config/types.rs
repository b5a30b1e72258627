use serde::Deserialize;

/// Main configuration structure for Wiki-Distill
///
/// Every section is optional; a missing section falls back to the defaults
/// targeting the Blood on the Clocktower wiki.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub cleaner: CleanerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Site topology: where the index lives and how its links look
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin used to resolve relative links and as the Referer header
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// The single page whose links define the crawl set
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// Selector for the container scanned for anchors on the index page
    #[serde(rename = "index-container")]
    pub index_container: String,

    /// Selector for the content root of a detail page
    #[serde(rename = "detail-container")]
    pub detail_container: String,

    /// Selector for the primary heading of a detail page
    #[serde(rename = "detail-heading")]
    pub detail_heading: String,

    /// Substring an href must contain to count as a content link
    #[serde(rename = "link-pattern")]
    pub link_pattern: String,

    /// Anchors whose title contains any of these are meta-pages
    #[serde(rename = "excluded-title-markers")]
    pub excluded_title_markers: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://clocktower-wiki.gstonegames.com".to_string(),
            index_url:
                "https://clocktower-wiki.gstonegames.com/index.php?title=%E4%BC%A0%E5%A5%87%E8%A7%92%E8%89%B2"
                    .to_string(),
            index_container: "div#mw-content-text".to_string(),
            detail_container: "div.mw-parser-output".to_string(),
            detail_heading: "h1#firstHeading".to_string(),
            link_pattern: "/index.php?title=".to_string(),
            excluded_title_markers: ["编辑", "文件", "模板", "分类", "Special"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// HTTP fetching behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Maximum automatic retries on HTTP 500/502/503/504
    #[serde(rename = "retry-limit")]
    pub retry_limit: u32,

    /// Base delay for the exponential backoff between automatic retries (milliseconds)
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Timeout of the first attempt (milliseconds)
    #[serde(rename = "timeout-short-ms")]
    pub timeout_short_ms: u64,

    /// Timeout of the manual retry (milliseconds)
    #[serde(rename = "timeout-long-ms")]
    pub timeout_long_ms: u64,

    /// Pause before the manual retry (milliseconds)
    #[serde(rename = "manual-retry-delay-ms")]
    pub manual_retry_delay_ms: u64,

    /// Pause after each successful detail page fetch (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Whether TLS certificates are validated
    #[serde(rename = "verify-tls")]
    pub verify_tls: bool,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept header sent with every request
    pub accept: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            retry_limit: 3,
            backoff_base_ms: 1000,
            timeout_short_ms: 15_000,
            timeout_long_ms: 20_000,
            manual_retry_delay_ms: 2000,
            politeness_delay_ms: 500,
            // The target wiki serves a misconfigured certificate
            verify_tls: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
                     image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"
                .to_string(),
        }
    }
}

/// Subtrees removed from detail pages before extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub selectors: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            selectors: [
                "#toc",
                ".mw-editsection",
                "script",
                "style",
                "#catlinks",
                "#footer",
                ".printfooter",
                "#mw-navigation",
                ".magnify",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON artifact
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "blood_clocktower_所有传奇角色.json".to_string(),
        }
    }
}
