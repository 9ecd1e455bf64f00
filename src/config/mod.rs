//! Configuration module for Link-Ripple
//!
//! Configuration is layered: built-in defaults, an optional TOML file, the
//! `BASE_URL` / `LINKS_FILE` / `REPORT_FILE` / `REPORT_404_FILE` environment
//! variables, then command-line flags (applied by the binary).
//!
//! # Example
//!
//! ```no_run
//! use link_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("link-ripple.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CheckerConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
