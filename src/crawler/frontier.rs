//! Crawl frontier: decides which discovered links are accepted
//!
//! The frontier holds no state of its own. Every decision reads and updates
//! the `CrawlState` passed in, so acceptance can be tested without a network.

use crate::crawler::LinkRecord;
use crate::state::CrawlState;
use crate::url::RootDomain;

/// Outcome of offering a link record to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Accepted for output; `fetch` is true if it was queued for fetching
    Accepted { fetch: bool },

    /// Host is outside the root domain
    OutOfDomain,

    /// URL was already accepted or seeded earlier in the run
    AlreadyVisited,

    /// The run has emitted its maximum number of links
    LimitReached,
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Acceptance rules for one crawl run
#[derive(Debug, Clone)]
pub struct Frontier {
    root: RootDomain,
    max_depth: u32,
}

impl Frontier {
    pub fn new(root: RootDomain, max_depth: u32) -> Self {
        Self { root, max_depth }
    }

    pub fn root(&self) -> &RootDomain {
        &self.root
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Offers a candidate record to the frontier
    ///
    /// A record is accepted only if its host is in the root domain, its URL
    /// has not been visited and the emitted-link cap has not been reached.
    /// Accepted records are marked visited and counted as emitted; they are
    /// queued for fetching only when their depth is within `max_depth`.
    pub fn admit(&self, state: &mut CrawlState, record: &LinkRecord) -> Admission {
        if !self.root.contains(&record.url) {
            return Admission::OutOfDomain;
        }

        if state.is_visited(record.url.as_str()) {
            return Admission::AlreadyVisited;
        }

        if state.limit_reached() {
            return Admission::LimitReached;
        }

        state.mark_visited(record.url.as_str());
        state.record_emitted();

        let fetch = record.depth <= self.max_depth;
        if fetch {
            state.enqueue(record.clone());
        }

        Admission::Accepted { fetch }
    }
}
