use crate::output::dated_filename;
use chrono::{Duration as DateDuration, NaiveDate};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Seed used when neither the config file nor `BASE_URL` names one
pub const DEFAULT_BASE_URL: &str = "https://library.soton.ac.uk";

/// Main configuration structure for Link-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub checker: CheckerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Overlays values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlays values from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = get("BASE_URL") {
            self.crawler.base_url = base_url;
        }
        if let Some(path) = get("LINKS_FILE") {
            self.output.links_file = Some(PathBuf::from(path));
        }
        if let Some(path) = get("REPORT_FILE") {
            self.output.report_file = Some(PathBuf::from(path));
        }
        if let Some(path) = get("REPORT_404_FILE") {
            self.output.report_404_file = Some(PathBuf::from(path));
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Seed URL; its host is the root domain unless `root_domain` is set
    pub base_url: String,

    /// Follow in-domain links past the seed page
    pub recursive: bool,

    /// Maximum depth of a fetched page (the seed is depth 0)
    pub max_depth: u32,

    /// Hard cap on the number of link records emitted per run
    pub max_links: usize,

    /// Maximum number of concurrent page fetches within a level
    pub max_concurrent_pages: usize,

    /// Per-page fetch timeout in seconds
    pub page_timeout_secs: u64,

    /// Host pattern links must match ("example.com" or "*.example.com")
    pub root_domain: Option<String>,

    /// Literal substrings identifying download-content links
    pub download_patterns: Vec<String>,
}

impl CrawlerConfig {
    /// Depth ceiling actually applied, taking `recursive` into account
    pub fn effective_max_depth(&self) -> u32 {
        if self.recursive {
            self.max_depth
        } else {
            0
        }
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            recursive: false,
            max_depth: 5,
            max_links: 10_000,
            max_concurrent_pages: 10,
            page_timeout_secs: 30,
            root_domain: None,
            download_patterns: vec!["ld.php?content_id=".to_string()],
        }
    }
}

/// Link validation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CheckerConfig {
    /// Additional attempts after the first one for transient failures
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds); doubles on each retry
    pub retry_delay_ms: u64,

    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,

    /// Global ceiling on simultaneous in-flight checks
    pub max_concurrent: usize,

    /// Number of input rows resolved and flushed together
    pub batch_size: usize,

    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
}

impl CheckerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 1000,
            timeout_secs: 15,
            max_concurrent: 50,
            batch_size: 50,
            accept_invalid_certs: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the client
    pub crawler_name: String,

    /// Version of the client
    pub crawler_version: String,

    /// URL with information about the client
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "LinkRipple".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/link-ripple/link-ripple".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory for dated output files
    pub reports_dir: PathBuf,

    /// Explicit link CSV path (crawler output, validator input)
    pub links_file: Option<PathBuf>,

    /// Explicit main report path
    pub report_file: Option<PathBuf>,

    /// Explicit 404 report path
    pub report_404_file: Option<PathBuf>,

    /// Age in days of the crawl output the validator reads by default
    pub links_lookback_days: i64,
}

impl OutputConfig {
    /// Where the crawler writes its link CSV
    pub fn crawl_links_path(&self, today: NaiveDate) -> PathBuf {
        self.links_file
            .clone()
            .unwrap_or_else(|| self.reports_dir.join(dated_filename("get-links", today)))
    }

    /// Where the validator reads its link CSV from
    ///
    /// Without an explicit path this is the crawl output from
    /// `links_lookback_days` ago.
    pub fn check_links_path(&self, today: NaiveDate) -> PathBuf {
        self.links_file.clone().unwrap_or_else(|| {
            let date = today - DateDuration::days(self.links_lookback_days);
            self.reports_dir.join(dated_filename("get-links", date))
        })
    }

    pub fn report_path(&self, today: NaiveDate) -> PathBuf {
        self.report_file.clone().unwrap_or_else(|| {
            self.reports_dir
                .join(dated_filename("check-links-report", today))
        })
    }

    pub fn report_404_path(&self, today: NaiveDate) -> PathBuf {
        self.report_404_file.clone().unwrap_or_else(|| {
            self.reports_dir
                .join(dated_filename("check-links-404-report", today))
        })
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            links_file: None,
            report_file: None,
            report_404_file: None,
            links_lookback_days: 7,
        }
    }
}
