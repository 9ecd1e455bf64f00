//! Concurrent link validator
//!
//! This module handles:
//! - Reading and validating the link CSV produced by the crawler
//! - Probing each URL with a bounded number of retries and exponential backoff
//! - Capping in-flight requests with a shared semaphore
//! - Streaming results into the main and 404 reports in input order

mod input;
pub mod probe;
mod retry;
mod scheduler;
mod types;

pub use input::{scan_links_file, LinkCsvReader};
pub use probe::{classify_error, probe_url};
pub use retry::{RetryPolicy, RetryState};
pub use scheduler::{run_check, ValidationScheduler};
pub use types::{CheckInput, CheckOutcome, CheckResult, ErrorKind};
