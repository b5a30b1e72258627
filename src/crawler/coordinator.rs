//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a run from the index page to the final record list:
//! - Fetching the index page (fatal on failure)
//! - Discovering crawl targets
//! - Fetching, cleaning and extracting every detail page in order
//! - Skipping detail pages that cannot be fetched
//! - Handing the records to a sink

use crate::config::Config;
use crate::crawler::cleaner::Cleaner;
use crate::crawler::extract::extract;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::{extract_links, CrawlTarget};
use crate::output::{ContentRecord, JsonFileSink, RecordSink};
use crate::state::CrawlPhase;
use crate::{ConfigError, DistillError};
use scraper::{Html, Selector};

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Number of targets found on the index page
    pub targets_discovered: usize,

    /// Number of records handed to the sink
    pub records_written: usize,

    /// Targets whose detail page could not be fetched
    pub targets_skipped: Vec<CrawlTarget>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    cleaner: Cleaner,
    detail_container: Selector,
    detail_heading: Selector,
    phase: CrawlPhase,
    targets_discovered: usize,
    skipped: Vec<CrawlTarget>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(DistillError)` - A selector or header in the configuration is invalid
    pub fn new(config: Config) -> Result<Self, DistillError> {
        let fetcher = Fetcher::new(&config.fetcher, &config.site.base_url)?;
        let cleaner = Cleaner::new(&config.cleaner)?;
        let detail_container = compile_selector(&config.site.detail_container)?;
        let detail_heading = compile_selector(&config.site.detail_heading)?;

        Ok(Self {
            config,
            fetcher,
            cleaner,
            detail_container,
            detail_heading,
            phase: CrawlPhase::Init,
            targets_discovered: 0,
            skipped: Vec::new(),
        })
    }

    /// Current phase of the run
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Targets skipped so far because their page could not be fetched
    pub fn skipped(&self) -> &[CrawlTarget] {
        &self.skipped
    }

    /// Number of targets discovered on the index page
    pub fn targets_discovered(&self) -> usize {
        self.targets_discovered
    }

    /// Runs the crawl and returns the records in crawl order
    ///
    /// Ids are assigned densely among successfully fetched pages, so a skipped
    /// target does not leave a gap.
    pub async fn run(&mut self) -> Result<Vec<ContentRecord>, DistillError> {
        let index_url = self.config.site.index_url.clone();
        tracing::info!("Fetching index page: {}", index_url);

        let index_body = self.fetcher.fetch(&index_url).await?;
        self.advance(CrawlPhase::IndexFetched)?;

        let targets = discover_targets(&index_body, &self.config);
        self.targets_discovered = targets.len();
        self.advance(CrawlPhase::LinksDiscovered)?;
        tracing::info!("Discovered {} pages, processing", targets.len());

        let total = targets.len();
        let mut records: Vec<ContentRecord> = Vec::with_capacity(total);

        for (idx, target) in targets.iter().enumerate() {
            self.advance(CrawlPhase::Fetching)?;
            tracing::info!("[{}/{}] Parsing: {}", idx + 1, total, target.title);

            let body = match self.fetcher.fetch(&target.url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", target.title, e);
                    self.skipped.push(target.clone());
                    continue;
                }
            };

            let id = records.len() + 1;
            let record = self.process_page(id, target, &body)?;
            records.push(record);
            self.advance(CrawlPhase::RecordAppended)?;

            self.fetcher.politeness_pause().await;
        }

        self.advance(CrawlPhase::Done)?;
        tracing::info!(
            "Crawl completed: {} records, {} skipped",
            records.len(),
            self.skipped.len()
        );

        Ok(records)
    }

    /// Cleans a fetched detail page and assembles its record
    fn process_page(
        &mut self,
        id: usize,
        target: &CrawlTarget,
        body: &[u8],
    ) -> Result<ContentRecord, DistillError> {
        self.advance(CrawlPhase::Cleaning)?;
        let mut document = Html::parse_document(&String::from_utf8_lossy(body));
        self.cleaner.clean(&mut document);

        self.advance(CrawlPhase::Extracting)?;
        // Html::select also walks detached nodes, so search from the root
        let root = document.root_element();
        let name = root
            .select(&self.detail_heading)
            .next()
            .map(|heading| heading.text().collect::<String>().trim().to_string())
            .filter(|heading| !heading.is_empty())
            .unwrap_or_else(|| target.title.clone());

        let content = match root.select(&self.detail_container).next() {
            Some(container) => extract(container),
            None => {
                let failure = DistillError::Parse {
                    url: target.url.clone(),
                    message: format!(
                        "content container '{}' not found",
                        self.config.site.detail_container
                    ),
                };
                tracing::warn!("{}, recording empty content", failure);
                String::new()
            }
        };

        Ok(ContentRecord {
            id,
            name,
            url: target.url.clone(),
            content,
        })
    }

    fn advance(&mut self, next: CrawlPhase) -> Result<(), DistillError> {
        if !self.phase.can_transition_to(next) {
            return Err(DistillError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

/// Parses the index page and extracts its crawl targets
fn discover_targets(body: &[u8], config: &Config) -> Vec<CrawlTarget> {
    let document = Html::parse_document(&String::from_utf8_lossy(body));
    extract_links(&document, &config.site)
}

fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Runs a crawl and writes the records to the given sink
///
/// Nothing is written if the index page cannot be fetched.
pub async fn run_crawl_with_sink(
    config: Config,
    sink: &dyn RecordSink,
) -> Result<CrawlReport, DistillError> {
    let mut coordinator = Coordinator::new(config)?;
    let records = coordinator.run().await?;
    sink.write(&records)?;

    Ok(CrawlReport {
        targets_discovered: coordinator.targets_discovered(),
        records_written: records.len(),
        targets_skipped: coordinator.skipped().to_vec(),
    })
}

/// Runs the main crawl operation, writing JSON to the configured output path
///
/// # Example
///
/// ```no_run
/// use wiki_distill::config::Config;
/// use wiki_distill::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default()).await?;
/// println!("{} records written", report.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, DistillError> {
    let sink = JsonFileSink::new(&config.output.path);
    run_crawl_with_sink(config, &sink).await
}
