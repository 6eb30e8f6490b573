//! Market-Crawler main entry point
//!
//! This is the command-line interface for the MQL5 market crawler.

use anyhow::Context;
use clap::Parser;
use market_crawler::config::{
    describe, validate, Category, Config, CrawlerConfig, FilterFlags, ListingFilter, ListingUrls,
    OutputConfig, Platform, PriceRange, DEFAULT_ORIGIN,
};
use market_crawler::crawler::Coordinator;
use market_crawler::output::{
    generate_html_report, group_by_author, print_statistics, write_json_records, RunStatistics,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Market-Crawler: MQL5 marketplace listing scraper
///
/// Crawls every listing page matching the chosen filters, groups the
/// products by author and writes a sortable HTML report.
#[derive(Parser, Debug)]
#[command(name = "market-crawler")]
#[command(version)]
#[command(about = "Scrape MQL5 market listings into an HTML report", long_about = None)]
struct Cli {
    /// Trading platform
    #[arg(short, long, value_enum)]
    platform: Platform,

    /// Product category
    #[arg(short, long, value_enum)]
    category: Category,

    /// Minimum price (USD)
    #[arg(long, value_name = "USD")]
    price_from: Option<f64>,

    /// Maximum price (USD)
    #[arg(long, value_name = "USD")]
    price_to: Option<f64>,

    /// Only products that have a rating
    #[arg(long)]
    rating: bool,

    /// Only products with reviews
    #[arg(long)]
    has_reviews: bool,

    /// Only products available for rent
    #[arg(long)]
    has_rent: bool,

    /// Number of pages fetched concurrently
    #[arg(short, long, default_value_t = 5)]
    workers: usize,

    /// Total attempts per page, including the first
    #[arg(long, default_value_t = 3)]
    attempts: u32,

    /// Path of the HTML report
    #[arg(short, long, default_value = "product_list.html")]
    output: PathBuf,

    /// Also write every record to this JSON file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Marketplace origin
    #[arg(long, default_value = DEFAULT_ORIGIN, hide = true)]
    origin: String,

    /// Show the URLs that would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn to_config(&self) -> Config {
        Config {
            filter: ListingFilter {
                platform: self.platform,
                category: self.category,
                price: PriceRange {
                    from: self.price_from,
                    to: self.price_to,
                },
                flags: FilterFlags {
                    rating: self.rating,
                    has_reviews: self.has_reviews,
                    has_rent: self.has_rent,
                },
            },
            crawler: CrawlerConfig {
                origin: self.origin.clone(),
                workers: self.workers,
                max_attempts: self.attempts,
                ..CrawlerConfig::default()
            },
            output: OutputConfig {
                report_path: self.output.clone(),
                json_path: self.json.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = cli.to_config();
    validate(&config).context("invalid options")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, !cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("market_crawler=info,warn"),
            1 => EnvFilter::new("market_crawler=debug,info"),
            2 => EnvFilter::new("market_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    let urls = ListingUrls::new(config);

    println!("=== Market-Crawler Dry Run ===\n");
    println!("Filter: {}", describe(&config.filter));
    println!("Base URL: {}", urls.base());
    println!("Query: {}", urls.query());
    println!("First page: {}", urls.first_page());
    println!("Page pattern: {}", urls.page(1).replace("/page1?", "/page{n}?"));

    println!("\nCrawler:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Attempts per page: {}", config.crawler.max_attempts);
    println!(
        "  Delay between attempts: {}-{}ms",
        config.crawler.min_delay_ms, config.crawler.max_delay_ms
    );

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path.display());
    if let Some(json_path) = &config.output.json_path {
        println!("  JSON: {}", json_path.display());
    }

    println!("\n✓ Options are valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, show_progress: bool) -> anyhow::Result<()> {
    tracing::info!("Starting to crawl products from {}", describe(&config.filter));

    let report_path = config.output.report_path.clone();
    let json_path = config.output.json_path.clone();

    let coordinator = Coordinator::new(config)?.with_progress(show_progress);
    let outcome = coordinator.run().await.context("crawl failed")?;

    if let Some(json_path) = &json_path {
        write_json_records(&outcome.records, json_path)
            .with_context(|| format!("writing {}", json_path.display()))?;
    }

    tracing::info!("Grouping {} products by author", outcome.records.len());
    let groups = group_by_author(outcome.records);

    generate_html_report(&groups, &report_path)
        .with_context(|| format!("writing {}", report_path.display()))?;

    if show_progress {
        let stats = RunStatistics::from_groups(outcome.pages, outcome.elapsed, &groups);
        print_statistics(&stats);
        println!("\n✓ Report written to: {}", report_path.display());
    }

    Ok(())
}
