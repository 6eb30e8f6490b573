//! Crawler module for listing page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Bounded retry with random delay
//! - Page count discovery and product card parsing
//! - A fixed-size worker pool
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod pagination;
mod parser;
mod pool;
mod retry;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, fetch_page};
pub use pagination::{discover_page_count, MAX_PAGES};
pub use parser::{parse_price, parse_products, ProductRecord, NOT_AVAILABLE};
pub use pool::{PoolResults, WorkerPool};
pub use retry::{with_retries, RetryPolicy};

use crate::config::Config;
use crate::MarketError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Discover the number of listing pages
/// 4. Fetch and parse every page on the worker pool
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed successfully
/// * `Err(MarketError)` - Crawl failed
pub async fn crawl(config: Config) -> Result<CrawlOutcome, MarketError> {
    run_crawl(config).await
}
