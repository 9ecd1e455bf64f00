//! Crawler module for breadth-first link discovery
//!
//! This module contains the crawling logic, including:
//! - HTTP page fetching under a timeout
//! - HTML parsing and link extraction
//! - Frontier acceptance (domain, dedup, depth and volume rules)
//! - Level-by-level crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod record;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use frontier::{Admission, Frontier};
pub use parser::extract_links;
pub use record::LinkRecord;
