//! Crawler module for page fetching and text extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Link discovery on the index page
//! - Removal of non-content markup
//! - Structural text extraction
//! - Overall crawl coordination

mod cleaner;
mod coordinator;
mod extract;
mod fetcher;
mod links;

pub use cleaner::Cleaner;
pub use coordinator::{run_crawl, run_crawl_with_sink, Coordinator, CrawlReport};
pub use extract::{extract, extract_raw, normalize_lines, EXAMPLE_PREFIX};
pub use fetcher::{
    backoff_delay, build_http_client, is_retryable_status, DocumentBytes, FetchError,
    FetchFailure, Fetcher,
};
pub use links::{extract_links, is_excluded_title, CrawlTarget, SeenTitles};

use crate::config::Config;
use crate::DistillError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the index page and discover targets
/// 3. Fetch, clean and extract every detail page
/// 4. Write the records to the configured JSON file
pub async fn crawl(config: Config) -> Result<CrawlReport, DistillError> {
    run_crawl(config).await
}
