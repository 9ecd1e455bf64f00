//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the level-by-level crawl loop, including:
//! - Seeding the crawl state from the configured base URL
//! - Fetching every page of a level under a concurrency cap
//! - Extracting links and offering them to the frontier
//! - Writing accepted records to the link CSV, flushed per level

use crate::config::Config;
use crate::crawler::{build_http_client, extract_links, fetch_page, FetchResult, Frontier, LinkRecord};
use crate::output::{CrawlStatistics, LinkCsvWriter};
use crate::state::{CrawlPhase, CrawlState};
use crate::url::{normalize_url, DownloadFilter, RootDomain};
use crate::{RippleError, UrlError};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// Main crawler coordinator structure
///
/// Owns the crawl state and is its only writer. Pages within a level are
/// fetched concurrently, but their results are folded into the state one at
/// a time, in the order the pages were queued.
pub struct Coordinator<W: Write> {
    state: CrawlState,
    frontier: Frontier,
    phase: CrawlPhase,
    filter: DownloadFilter,
    client: Client,
    writer: LinkCsvWriter<W>,
    stats: CrawlStatistics,
    page_timeout: Duration,
    max_concurrent_pages: usize,
}

impl<W: Write> Coordinator<W> {
    /// Creates a coordinator seeded with `config.crawler.base_url`
    ///
    /// # Arguments
    ///
    /// * `config` - The loaded configuration
    /// * `writer` - Sink for accepted link records
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(RippleError)` - The seed URL is unusable or the client failed to build
    pub fn new(config: &Config, writer: LinkCsvWriter<W>) -> Result<Self, RippleError> {
        let crawler = &config.crawler;
        let seed = normalize_url(&crawler.base_url)?;

        let root = match &crawler.root_domain {
            Some(pattern) => RootDomain::new(pattern),
            None => RootDomain::from_seed(&seed).ok_or(UrlError::MissingDomain)?,
        };

        let client = build_http_client(&config.user_agent, crawler.page_timeout(), false)?;

        let mut state = CrawlState::new(crawler.max_links);
        state.seed(LinkRecord::seed(seed));

        Ok(Self {
            state,
            frontier: Frontier::new(root, crawler.effective_max_depth()),
            phase: CrawlPhase::Idle,
            filter: DownloadFilter::new(crawler.download_patterns.clone()),
            client,
            writer,
            stats: CrawlStatistics::new(),
            page_timeout: crawler.page_timeout(),
            max_concurrent_pages: crawler.max_concurrent_pages.max(1),
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Flushes the link CSV and returns the underlying writer
    pub fn into_inner(self) -> Result<W, RippleError> {
        self.writer.into_inner()
    }

    /// Runs the crawl to completion
    ///
    /// Levels are processed in increasing depth. The loop stops when the
    /// next level is empty, lies beyond the depth ceiling, or the link cap
    /// has been reached. Page failures are logged and skipped; only output
    /// errors abort the run.
    pub async fn run(&mut self) -> Result<CrawlStatistics, RippleError> {
        tracing::info!(
            "Starting crawl within {} (max depth {}, max links {})",
            self.frontier.root().pattern(),
            self.frontier.max_depth(),
            self.state.max_links()
        );

        let start_time = Instant::now();
        let mut depth = 0u32;

        while depth <= self.frontier.max_depth()
            && self.state.level_len(depth) > 0
            && !self.state.limit_reached()
        {
            self.phase.transition(CrawlPhase::FetchingLevel(depth))?;
            self.crawl_level(depth).await?;
            depth += 1;
        }

        if self.state.limit_reached() {
            // Pages already queued for the next level will never be fetched
            if depth <= self.frontier.max_depth() {
                self.stats.record_unfetched(self.state.level_len(depth) as u64);
            }
            tracing::info!(
                "Link limit of {} reached, stopping with {} queued pages unfetched",
                self.state.max_links(),
                self.stats.pages_unfetched
            );
        }

        self.phase.transition(CrawlPhase::Draining)?;
        self.writer.flush()?;
        self.phase.transition(CrawlPhase::Done)?;

        tracing::info!(
            "Crawl completed: {} links written, {} URLs visited in {:?}",
            self.writer.rows_written(),
            self.state.visited_count(),
            start_time.elapsed()
        );

        Ok(self.stats.clone())
    }

    /// Fetches every page queued at `depth` and processes the results
    async fn crawl_level(&mut self, depth: u32) -> Result<(), RippleError> {
        let pages = self.state.take_level(depth);
        let queued = pages.len();
        let mut processed = 0usize;
        tracing::info!("Level {}: fetching {} pages", depth, queued);
        self.stats.record_level(depth);

        let client = &self.client;
        let timeout = self.page_timeout;

        let mut fetches = stream::iter(pages)
            .map(move |page| async move {
                let result = fetch_page(client, &page.url, timeout).await;
                (page, result)
            })
            .buffered(self.max_concurrent_pages);

        while let Some((page, result)) = fetches.next().await {
            processed += 1;
            self.stats.record_fetch(&result);

            let (final_url, body) = match result {
                FetchResult::Success { final_url, body, .. } => (final_url, body),
                FetchResult::ContentMismatch { content_type } => {
                    tracing::debug!("Skipping {}: not HTML ({})", page.url, content_type);
                    continue;
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("Failed to load {}: HTTP {}", page.url, status_code);
                    continue;
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!("Failed to load {}: {}", page.url, error);
                    continue;
                }
                FetchResult::Timeout => {
                    tracing::warn!("Failed to load {}: timed out", page.url);
                    continue;
                }
            };

            let links = extract_links(&body, &final_url, &page, &self.filter);
            tracing::debug!("Found {} links on {}", links.len(), page.url);

            for record in &links {
                let admission = self.frontier.admit(&mut self.state, record);
                self.stats.record_admission(admission);
                if admission.is_accepted() {
                    self.writer.write(record)?;
                }
            }

            if self.state.limit_reached() {
                let skipped = queued - processed;
                if skipped > 0 {
                    tracing::debug!("Link limit reached on level {}, dropping {} pages", depth, skipped);
                }
                self.stats.record_unfetched(skipped as u64);
                break;
            }
        }

        self.writer.flush()?;
        tracing::info!(
            "Level {} done: {} links written so far",
            depth,
            self.state.total_links_emitted()
        );

        Ok(())
    }
}

/// Runs a complete crawl, writing the link CSV to `links_path`
///
/// This function:
///
/// 1. Normalizes the seed and derives the root domain
/// 2. Creates the output file and writes its header
/// 3. Fetches level after level until a stop condition holds
/// 4. Flushes the output and logs a summary
///
/// # Example
///
/// ```no_run
/// use link_ripple::config::Config;
/// use link_ripple::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_crawl(&Config::default(), Path::new("reports/get-links.csv")).await?;
/// println!("{} links", stats.links_emitted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, links_path: &Path) -> Result<CrawlStatistics, RippleError> {
    let writer: LinkCsvWriter<File> = LinkCsvWriter::create(links_path)?;
    let mut coordinator = Coordinator::new(config, writer)?;
    let stats = coordinator.run().await?;
    stats.log_summary();
    Ok(stats)
}
