//! Link-Ripple main entry point
//!
//! This is the command-line interface for the Link-Ripple crawler and link
//! validator.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use link_ripple::checker::run_check;
use link_ripple::config::{load_config_with_hash, validate, Config};
use link_ripple::crawler::run_crawl;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Link-Ripple: a breadth-first link crawler and validator
///
/// `get-links` walks a site from its base URL and writes every in-domain link
/// it finds to a dated CSV. `check-links` reads such a CSV and reports the
/// status of every link, with 404s collected in a separate report.
#[derive(Parser, Debug)]
#[command(name = "link-ripple")]
#[command(version)]
#[command(about = "Crawl a site for links and check them", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the base URL and write discovered links to CSV
    GetLinks(GetLinksArgs),

    /// Check every link in a link CSV and write status reports
    CheckLinks(CheckLinksArgs),
}

#[derive(clap::Args, Debug)]
struct GetLinksArgs {
    /// Follow in-domain links past the seed page
    #[arg(short, long)]
    recurse: bool,

    /// Maximum depth of a fetched page (the seed is depth 0)
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Stop after this many links have been written
    #[arg(long)]
    max_links: Option<usize>,

    /// Seed URL (overrides BASE_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Output file (defaults to a dated file in the reports directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct CheckLinksArgs {
    /// Link CSV to check (overrides LINKS_FILE and the config file)
    #[arg(short, long)]
    links_file: Option<PathBuf>,

    /// Additional attempts for transient failures
    #[arg(long)]
    max_retries: Option<u32>,

    /// Rows read and written per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Maximum requests in flight
    #[arg(long)]
    concurrency: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Csv,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let result = match load_configuration(&cli) {
        Ok(config) => {
            let today = Local::now().date_naive();
            match cli.command {
                Command::GetLinks(args) => handle_get_links(config, args, today).await,
                Command::CheckLinks(args) => handle_check_links(config, args, today).await,
            }
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_ripple=info,warn"),
            1 => EnvFilter::new("link_ripple=debug,info"),
            2 => EnvFilter::new("link_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (if any) and overlays the environment
fn load_configuration(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    config.apply_env();
    Ok(config)
}

/// Handles the `get-links` command
async fn handle_get_links(
    mut config: Config,
    args: GetLinksArgs,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.recurse {
        config.crawler.recursive = true;
    }
    if let Some(depth) = args.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(max_links) = args.max_links {
        config.crawler.max_links = max_links;
    }
    if let Some(base_url) = args.base_url {
        config.crawler.base_url = base_url;
    }
    if let Some(output) = args.output {
        config.output.links_file = Some(output);
    }
    validate(&config)?;

    let links_path = config.output.crawl_links_path(today);
    tracing::info!(
        "Crawling {} (recursive: {}, format: {:?})",
        config.crawler.base_url,
        config.crawler.recursive,
        args.format
    );

    let stats = run_crawl(&config, &links_path).await?;
    tracing::info!(
        "Wrote {} links to {}",
        stats.links_emitted,
        links_path.display()
    );

    println!("LINKS_FILE={}", links_path.display());
    Ok(())
}

/// Handles the `check-links` command
async fn handle_check_links(
    mut config: Config,
    args: CheckLinksArgs,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = args.links_file {
        config.output.links_file = Some(path);
    }
    if let Some(max_retries) = args.max_retries {
        config.checker.max_retries = max_retries;
    }
    if let Some(batch_size) = args.batch_size {
        config.checker.batch_size = batch_size;
    }
    if let Some(concurrency) = args.concurrency {
        config.checker.max_concurrent = concurrency;
    }
    validate(&config)?;

    let links_path = config.output.check_links_path(today);
    let report_path = config.output.report_path(today);
    let report_404_path = config.output.report_404_path(today);

    let stats = run_check(&config, &links_path, &report_path, &report_404_path).await?;
    stats.log_summary();

    println!("LINKS_FILE={}", links_path.display());
    println!("REPORT_FILE={}", report_path.display());
    println!("REPORT_404_FILE={}", report_404_path.display());
    Ok(())
}
