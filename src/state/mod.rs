//! State module for tracking crawl progress
//!
//! A run moves through a fixed sequence of phases: the index page is fetched
//! once, its links are discovered, and then every target cycles through
//! fetching, cleaning and extraction until the run is done.

mod crawl_phase;

// Re-export main types
pub use crawl_phase::CrawlPhase;
