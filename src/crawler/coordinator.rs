//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the crawl together:
//! - Discovering the page count from the first listing page
//! - Building one URL per page
//! - Dispatching page jobs to the worker pool
//! - Collecting records in completion order

use crate::config::{validate, Config, ListingUrls};
use crate::crawler::pagination::discover_page_count;
use crate::crawler::parser::{parse_products, ProductRecord};
use crate::crawler::pool::WorkerPool;
use crate::crawler::retry::{with_retries, RetryPolicy};
use crate::crawler::{build_http_client, fetch_page};
use crate::MarketError;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// All records, in page completion order
    pub records: Vec<ProductRecord>,

    /// Number of listing pages crawled
    pub pages: u32,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// State shared by every page job
struct PageContext {
    client: Client,
    policy: RetryPolicy,
    origin: Url,
}

impl PageContext {
    /// Fetches `url` with retries
    async fn fetch(&self, url: &str) -> Result<String, MarketError> {
        with_retries(&self.policy, url, |url| {
            let client = &self.client;
            async move { fetch_page(client, &url).await }
        })
        .await
    }

    /// Fetches and parses one listing page
    ///
    /// Parse errors are not retried: the same markup would fail again.
    async fn crawl_page(&self, url: &str) -> Result<Vec<ProductRecord>, MarketError> {
        let body = self.fetch(url).await?;
        parse_products(&body, &self.origin).map_err(|source| MarketError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    pool: WorkerPool,
    context: Arc<PageContext>,
    urls: ListingUrls,
    show_progress: bool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration; validated here
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MarketError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config) -> Result<Self, MarketError> {
        validate(&config)?;

        let origin = Url::parse(&config.crawler.origin)
            .map_err(|e| crate::ConfigError::InvalidUrl(e.to_string()))?;
        let client = build_http_client()?;
        let policy = RetryPolicy::from_config(&config.crawler);
        let urls = ListingUrls::new(&config);

        Ok(Self {
            pool: WorkerPool::new(config.crawler.workers),
            context: Arc::new(PageContext {
                client,
                policy,
                origin,
            }),
            urls,
            show_progress: true,
        })
    }

    /// Enables or disables the terminal progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn urls(&self) -> &ListingUrls {
        &self.urls
    }

    /// Fetches the first listing page and determines the page count
    pub async fn discover_pages(&self) -> Result<u32, MarketError> {
        let first_page = self.urls.first_page();
        tracing::info!("Discovering page count from {}", first_page);

        let body = self.context.fetch(&first_page).await?;
        let pages = discover_page_count(&body).map_err(|source| MarketError::Parse {
            url: first_page.clone(),
            source,
        })?;

        tracing::info!("Found {} page(s)", pages);
        Ok(pages)
    }

    /// Runs the crawl
    ///
    /// 1. Discovers the page count
    /// 2. Submits one job per page to the worker pool
    /// 3. Appends each page's records as its job completes
    ///
    /// A failed page aborts the crawl, but only after every submitted job
    /// has finished.
    pub async fn run(&self) -> Result<CrawlOutcome, MarketError> {
        let start_time = Instant::now();

        let pages = self.discover_pages().await?;
        let page_urls = self.urls.pages(pages);

        tracing::info!(
            "Crawling {} page(s) with {} worker(s)",
            page_urls.len(),
            self.pool.size()
        );

        let context = Arc::clone(&self.context);
        let mut results = self.pool.run(page_urls, move |url: String| {
            let context = Arc::clone(&context);
            async move {
                let result = context.crawl_page(&url).await;
                (url, result)
            }
        });

        let progress = self.progress_bar(results.submitted() as u64);
        let mut records = Vec::new();
        let mut first_error = None;
        let mut completed = 0usize;

        while let Some((url, result)) = results.next().await {
            completed += 1;
            match result {
                Ok(page_records) => {
                    tracing::debug!("{}: {} record(s)", url, page_records.len());
                    records.extend(page_records);
                }
                Err(e) => {
                    tracing::error!("Page {} failed: {}", url, e);
                    first_error.get_or_insert(e);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        results.join().await?;

        if let Some(e) = first_error {
            return Err(e);
        }

        tracing::info!(
            "Crawl completed: {} page(s), {} record(s) in {:?}",
            completed,
            records.len(),
            start_time.elapsed()
        );

        Ok(CrawlOutcome {
            records,
            pages,
            elapsed: start_time.elapsed(),
        })
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::with_template("Crawling pages {bar:40} {pos}/{len} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use market_crawler::config::{
///     Category, Config, CrawlerConfig, FilterFlags, ListingFilter, OutputConfig, Platform,
///     PriceRange,
/// };
/// use market_crawler::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     filter: ListingFilter {
///         platform: Platform::Mt4,
///         category: Category::Utility,
///         price: PriceRange::default(),
///         flags: FilterFlags::default(),
///     },
///     crawler: CrawlerConfig::default(),
///     output: OutputConfig::default(),
/// };
/// let outcome = run_crawl(config).await?;
/// println!("{} records", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, MarketError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Category, CrawlerConfig, FilterFlags, ListingFilter, OutputConfig, Platform, PriceRange,
    };

    fn create_test_config() -> Config {
        Config {
            filter: ListingFilter {
                platform: Platform::Mt5,
                category: Category::Library,
                price: PriceRange::default(),
                flags: FilterFlags::default(),
            },
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_coordinator_creation() {
        let coordinator = Coordinator::new(create_test_config()).unwrap();
        assert_eq!(
            coordinator.urls().first_page(),
            "https://www.mql5.com/en/market/mt5/library?count=48"
        );
    }

    #[test]
    fn test_coordinator_rejects_invalid_config() {
        let mut config = create_test_config();
        config.crawler.workers = 0;
        assert!(matches!(
            Coordinator::new(config),
            Err(MarketError::Config(_))
        ));
    }

    #[test]
    fn test_pool_sized_from_config() {
        let mut config = create_test_config();
        config.crawler.workers = 7;
        let coordinator = Coordinator::new(config).unwrap();
        assert_eq!(coordinator.pool.size(), 7);
    }

    #[test]
    fn test_hidden_progress_bar() {
        let coordinator = Coordinator::new(create_test_config())
            .unwrap()
            .with_progress(false);
        assert!(coordinator.progress_bar(3).is_hidden());
    }
}
