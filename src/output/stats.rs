//! Run statistics for crawls and validations
//!
//! Counters are accumulated while a run progresses and logged at the end so
//! partial coverage is visible without inspecting the output files.

use crate::checker::{CheckResult, ErrorKind};
use crate::crawler::{Admission, FetchResult};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Pages fetched and parsed successfully
    pub pages_fetched: u64,

    /// Pages that failed to load (HTTP error, timeout, network error)
    pub pages_failed: u64,

    /// Pages skipped because they were not HTML
    pub pages_not_html: u64,

    /// Link records accepted and written
    pub links_emitted: u64,

    /// Candidates rejected by the domain restriction
    pub out_of_domain: u64,

    /// Candidates rejected as already visited
    pub duplicates: u64,

    /// Candidates rejected because the link cap was reached
    pub over_limit: u64,

    /// Queued pages never fetched because the link cap was reached
    pub pages_unfetched: u64,

    /// Deepest level that was fetched
    pub deepest_level: Option<u32>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&mut self, result: &FetchResult) {
        match result {
            FetchResult::Success { .. } => self.pages_fetched += 1,
            FetchResult::ContentMismatch { .. } => self.pages_not_html += 1,
            FetchResult::HttpError { .. }
            | FetchResult::NetworkError { .. }
            | FetchResult::Timeout => self.pages_failed += 1,
        }
    }

    pub fn record_admission(&mut self, admission: Admission) {
        match admission {
            Admission::Accepted { .. } => self.links_emitted += 1,
            Admission::OutOfDomain => self.out_of_domain += 1,
            Admission::AlreadyVisited => self.duplicates += 1,
            Admission::LimitReached => self.over_limit += 1,
        }
    }

    pub fn record_unfetched(&mut self, pages: u64) {
        self.pages_unfetched += pages;
    }

    pub fn record_level(&mut self, depth: u32) {
        self.deepest_level = Some(depth);
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl summary: {} pages fetched, {} failed, {} not HTML",
            self.pages_fetched,
            self.pages_failed,
            self.pages_not_html
        );
        tracing::info!(
            "Links: {} emitted, {} out of domain, {} duplicates, {} over limit",
            self.links_emitted,
            self.out_of_domain,
            self.duplicates,
            self.over_limit
        );
        if self.pages_unfetched > 0 {
            tracing::info!("Pages left unfetched at the link limit: {}", self.pages_unfetched);
        }
        if let Some(depth) = self.deepest_level {
            tracing::info!("Deepest level fetched: {}", depth);
        }
    }
}

/// A row that did not resolve to a 2xx/3xx status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    pub line_number: u64,
    pub url: String,
    pub label: String,
}

/// Validation statistics summary
#[derive(Debug, Clone, Default)]
pub struct CheckStatistics {
    pub total: u64,
    pub ok: u64,
    pub not_found: u64,
    pub other_status: u64,
    pub errors: HashMap<ErrorKind, u64>,
    pub broken: Vec<BrokenLink>,
}

impl CheckStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &CheckResult) {
        self.total += 1;

        match (result.status_code(), result.error_kind()) {
            (Some(404), _) => self.not_found += 1,
            (Some(code), _) if (200..400).contains(&code) => self.ok += 1,
            (Some(_), _) => self.other_status += 1,
            (None, Some(kind)) => *self.errors.entry(kind).or_insert(0) += 1,
            (None, None) => {}
        }

        if result.is_broken() {
            self.broken.push(BrokenLink {
                line_number: result.line_number,
                url: result.url.to_string(),
                label: result.label(),
            });
        }
    }

    pub fn total_errors(&self) -> u64 {
        self.errors.values().sum()
    }

    pub fn has_broken_links(&self) -> bool {
        !self.broken.is_empty()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Check summary: {} checked, {} ok, {} not found, {} other status, {} errors",
            self.total,
            self.ok,
            self.not_found,
            self.other_status,
            self.total_errors()
        );

        for (kind, count) in &self.errors {
            tracing::info!("  {}: {}", kind, count);
        }

        if self.broken.is_empty() {
            tracing::info!("No broken links found");
            return;
        }

        tracing::warn!("Broken links found in {} lines:", self.broken.len());
        let mut broken = self.broken.clone();
        broken.sort_by_key(|b| b.line_number);
        for link in &broken {
            tracing::warn!("  Line {}: {} ({})", link.line_number, link.url, link.label);
        }
    }
}
