use crate::crawler::LinkRecord;
use std::collections::HashSet;

/// Mutable state of a single crawl run
///
/// Owned by the crawl controller and handed to the frontier by `&mut` for
/// each acceptance decision, so there is never more than one writer.
#[derive(Debug)]
pub struct CrawlState {
    /// Normalized URLs already accepted or seeded; never removed
    visited: HashSet<String>,

    /// Work queue partitioned by depth
    queue_by_level: Vec<Vec<LinkRecord>>,

    /// Number of link records accepted for output
    total_links_emitted: usize,

    /// Hard cap on `total_links_emitted`
    max_links: usize,
}

impl CrawlState {
    pub fn new(max_links: usize) -> Self {
        Self {
            visited: HashSet::new(),
            queue_by_level: Vec::new(),
            total_links_emitted: 0,
            max_links,
        }
    }

    /// Registers the seed page: visited and queued at its depth, not emitted
    pub fn seed(&mut self, record: LinkRecord) {
        self.visited.insert(record.url.as_str().to_string());
        self.enqueue(record);
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Adds a URL to the visited set; returns false if it was already there
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Appends a record to the queue for its depth
    pub fn enqueue(&mut self, record: LinkRecord) {
        let depth = record.depth as usize;
        if self.queue_by_level.len() <= depth {
            self.queue_by_level.resize_with(depth + 1, Vec::new);
        }
        self.queue_by_level[depth].push(record);
    }

    /// Removes and returns every record queued at `depth`
    pub fn take_level(&mut self, depth: u32) -> Vec<LinkRecord> {
        self.queue_by_level
            .get_mut(depth as usize)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn level_len(&self, depth: u32) -> usize {
        self.queue_by_level
            .get(depth as usize)
            .map_or(0, Vec::len)
    }

    /// Counts one emitted record
    pub fn record_emitted(&mut self) {
        self.total_links_emitted += 1;
    }

    pub fn total_links_emitted(&self) -> usize {
        self.total_links_emitted
    }

    pub fn max_links(&self) -> usize {
        self.max_links
    }

    pub fn limit_reached(&self) -> bool {
        self.total_links_emitted >= self.max_links
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
