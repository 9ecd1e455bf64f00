//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the visited set, the per-level work queue and the emitted
//!   link counter for one crawl run
//! - `CrawlPhase`: the crawl controller's state machine

mod crawl_state;
mod phase;

pub use crawl_state::CrawlState;
pub use phase::CrawlPhase;
