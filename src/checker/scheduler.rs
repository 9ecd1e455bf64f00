//! Validation scheduler
//!
//! This module handles:
//! - Reading the link CSV in fixed-size batches
//! - Checking each batch concurrently under a global concurrency ceiling
//! - Writing every result, in input order, to the main and 404 reports
//! - Progress logging and run statistics

use crate::checker::probe::probe_url;
use crate::checker::{scan_links_file, CheckInput, CheckResult, LinkCsvReader, RetryPolicy};
use crate::config::Config;
use crate::crawler::build_http_client;
use crate::output::{CheckStatistics, ReportWriter};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Schedules link checks under a shared concurrency ceiling
///
/// All attempts of all URLs draw permits from the same semaphore, so no more
/// than `max_concurrent` requests are ever in flight, retries included.
pub struct ValidationScheduler {
    client: Client,
    policy: RetryPolicy,

    /// Global semaphore for limiting in-flight requests
    limiter: Arc<Semaphore>,

    batch_size: usize,
}

impl ValidationScheduler {
    pub fn new(client: Client, policy: RetryPolicy, max_concurrent: usize, batch_size: usize) -> Self {
        Self {
            client,
            policy,
            limiter: Arc::new(Semaphore::new(max_concurrent)),
            batch_size: batch_size.max(1),
        }
    }

    /// Builds a scheduler from the checker and user agent configuration
    pub fn from_config(config: &Config) -> Result<Self, crate::RippleError> {
        let checker = &config.checker;
        let client = build_http_client(
            &config.user_agent,
            checker.timeout(),
            checker.accept_invalid_certs,
        )?;
        let policy = RetryPolicy::new(checker.max_retries, checker.retry_delay(), checker.timeout());
        Ok(Self::new(client, policy, checker.max_concurrent, checker.batch_size))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Checks every row of `reader`, writing results through `writer`
    ///
    /// Batches are processed one after another. Within a batch, checks run
    /// concurrently and complete in any order; results are sorted back into
    /// input order before they are written, and both reports are flushed
    /// after every batch.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of input rows
    /// * `total` - Number of rows in the input, for progress reporting
    /// * `writer` - Report sink
    /// * `stats` - Statistics updated with every result
    pub async fn run<R: Read, W: Write>(
        &self,
        reader: &mut LinkCsvReader<R>,
        total: u64,
        writer: &mut ReportWriter<W>,
        stats: &mut CheckStatistics,
    ) -> Result<(), crate::RippleError> {
        let mut processed = 0u64;
        let mut batch_number = 0u32;

        loop {
            let batch = reader.next_batch(self.batch_size)?;
            if batch.is_empty() {
                break;
            }
            batch_number += 1;
            let batch_len = batch.len() as u64;

            let mut results = self.check_batch(batch).await;
            results.sort_by_key(|r| r.line_number);

            for result in &results {
                if result.is_broken() {
                    tracing::debug!("Line {}: {} -> {}", result.line_number, result.url, result.label());
                }
                writer.append(result)?;
                stats.record(result);
            }
            writer.flush()?;

            processed += batch_len;
            tracing::info!(
                "Batch {} complete: {}/{} URLs processed, {} remaining",
                batch_number,
                processed,
                total,
                total.saturating_sub(processed)
            );
        }

        Ok(())
    }

    /// Checks one batch concurrently; results come back in completion order
    pub async fn check_batch(&self, batch: Vec<CheckInput>) -> Vec<CheckResult> {
        batch
            .into_iter()
            .map(|input| self.check_one(input))
            .collect::<FuturesUnordered<_>>()
            .collect()
            .await
    }

    /// Resolves one input row to exactly one result
    pub async fn check_one(&self, input: CheckInput) -> CheckResult {
        let client = &self.client;
        let url = &input.url;
        let line_number = input.line_number;

        let (outcome, attempts) = self
            .policy
            .run(&self.limiter, move |attempt| {
                tracing::debug!("Checking line {} (attempt {}): {}", line_number, attempt, url);
                probe_url(client, url)
            })
            .await;

        CheckResult::new(input, outcome, attempts)
    }
}

/// Runs a complete validation pass
///
/// The whole input is validated up front, so a malformed row aborts the run
/// before either report is created.
///
/// # Arguments
///
/// * `config` - Loaded configuration
/// * `links_path` - Link CSV to read
/// * `report_path` - Main report to write
/// * `report_404_path` - 404-only report to write
pub async fn run_check(
    config: &Config,
    links_path: &Path,
    report_path: &Path,
    report_404_path: &Path,
) -> Result<CheckStatistics, crate::RippleError> {
    let total = scan_links_file(links_path)?;
    tracing::info!("Loaded {} URLs from {}", total, links_path.display());

    let scheduler = ValidationScheduler::from_config(config)?;
    let mut reader = LinkCsvReader::open(links_path)?;
    let mut writer = ReportWriter::create(report_path, report_404_path)?;
    let mut stats = CheckStatistics::new();

    tracing::info!(
        "Checking with concurrency {}, batch size {}, {} retries",
        config.checker.max_concurrent,
        config.checker.batch_size,
        config.checker.max_retries
    );

    let started = Instant::now();
    scheduler.run(&mut reader, total, &mut writer, &mut stats).await?;
    writer.flush()?;

    tracing::info!(
        "Validation finished in {:.1}s: {} rows in main report, {} in 404 report",
        started.elapsed().as_secs_f64(),
        writer.main_rows(),
        writer.not_found_rows()
    );

    Ok(stats)
}
