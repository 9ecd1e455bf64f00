//! URL handling module for Link-Ripple
//!
//! This module provides URL normalization for the crawl's visited set,
//! root-domain scoping, and the download-content link filter.

mod domain;
mod filter;
mod normalize;

pub use domain::{extract_domain, matches_wildcard, RootDomain};
pub use filter::DownloadFilter;
pub use normalize::normalize_url;
