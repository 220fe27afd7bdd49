//! Sitemap-Crawl main entry point
//!
//! This is the command-line interface for the sitemap crawl checker.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sitemap_crawl::config::{load_config_with_hash, validate, validate_sitemap_url, Config};
use sitemap_crawl::crawler::{crawl_sitemap, CrawlConfig, ReqwestFetcher};
use sitemap_crawl::output::{print_report, report_to_json};
use tracing_subscriber::EnvFilter;

/// Sitemap-Crawl: crawl every URL of a sitemap and report failures
///
/// Fetches all URLs listed in a sitemap (following sitemap indexes one level
/// deep), optionally checks the links and images found in those pages, and
/// exits non-zero if any URL did not answer 200.
#[derive(Parser, Debug)]
#[command(name = "sitemap-crawl")]
#[command(version)]
#[command(about = "Crawl a sitemap and report non-200 URLs", long_about = None)]
struct Cli {
    /// Sitemap URL (overrides the config file)
    #[arg(value_name = "SITEMAP")]
    sitemap: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of parallel requests
    #[arg(short, long, allow_negative_numbers = true)]
    throttle: Option<i64>,

    /// Send requests to this host instead of the one in the sitemap
    #[arg(long)]
    host: Option<String>,

    /// Basic auth user
    #[arg(short, long)]
    user: Option<String>,

    /// Basic auth password
    #[arg(short, long, requires = "user")]
    password: Option<String>,

    /// Also crawl links pointing to other hosts
    #[arg(long)]
    crawl_external: bool,

    /// Also crawl hyperlinks found in the sitemap pages
    #[arg(long)]
    crawl_hyperlinks: bool,

    /// Also crawl images found in the sitemap pages
    #[arg(long)]
    crawl_images: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config)?;

    let Some(sitemap_url) = config.sitemap.url.clone() else {
        bail!("No sitemap URL given; pass one as argument or set [sitemap] url");
    };
    validate_sitemap_url(&sitemap_url)?;

    let fetcher = ReqwestFetcher::new(&config.http).context("Failed to build HTTP client")?;
    let crawl_config = CrawlConfig::from_config(&config, Arc::new(fetcher));

    tracing::info!("Crawling sitemap {}", sitemap_url);
    let report = crawl_sitemap(&sitemap_url, crawl_config).await?;

    if cli.json {
        println!("{}", report_to_json(&report)?);
    } else {
        print_report(&report);
    }

    if let Err(e) = report.verdict() {
        tracing::error!("Crawl failed: {}", e);
        return Err(e.into());
    }

    tracing::info!("Crawl completed successfully");
    Ok(())
}

/// Layers command-line flags over the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(sitemap) = &cli.sitemap {
        config.sitemap.url = Some(sitemap.clone());
    }
    if let Some(throttle) = cli.throttle {
        config.crawler.throttle = throttle;
    }
    if let Some(host) = &cli.host {
        config.crawler.host = Some(host.clone());
    }
    if let Some(user) = &cli.user {
        config.http.user = Some(user.clone());
        config.http.password = cli.password.clone();
    }

    config.links.crawl_external_links |= cli.crawl_external;
    config.links.crawl_hyperlinks |= cli.crawl_hyperlinks;
    config.links.crawl_images |= cli.crawl_images;
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_crawl=info,warn"),
            1 => EnvFilter::new("sitemap_crawl=debug,info"),
            2 => EnvFilter::new("sitemap_crawl=trace,debug"),
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
