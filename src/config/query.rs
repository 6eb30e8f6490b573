//! Listing URL construction
//!
//! Turns a validated [`Config`] into the listing base URL, the frozen filter
//! query string and the per-page URLs the crawler fetches.

use crate::config::types::{Config, CrawlerConfig, ListingFilter, PAGE_SIZE};

/// Builds the listing base URL: `{origin}/{language}/market/{platform}/{category}`
pub fn base_url(crawler: &CrawlerConfig, filter: &ListingFilter) -> String {
    format!(
        "{}/{}/market/{}/{}",
        crawler.origin.trim_end_matches('/'),
        crawler.language,
        filter.platform.slug(),
        filter.category.slug()
    )
}

/// Builds the filter query string
///
/// Parameters appear as `PriceFrom`, `PriceTo`, `count`, then the enabled
/// boolean flags, joined with `&`.
pub fn filter_query(filter: &ListingFilter) -> String {
    let mut query = Vec::new();

    if let Some(from) = filter.price.from {
        query.push(format!("PriceFrom={}", from));
    }
    if let Some(to) = filter.price.to {
        query.push(format!("PriceTo={}", to));
    }
    query.push(format!("count={}", PAGE_SIZE));
    query.extend(filter.flags.params().into_iter().map(String::from));

    query.join("&")
}

/// Immutable set of URLs for one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingUrls {
    base: String,
    query: String,
}

impl ListingUrls {
    pub fn new(config: &Config) -> Self {
        Self {
            base: base_url(&config.crawler, &config.filter),
            query: filter_query(&config.filter),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// URL of the unpaginated first page, used for page count discovery
    pub fn first_page(&self) -> String {
        format!("{}?{}", self.base, self.query)
    }

    /// URL of page `n` (1-based)
    pub fn page(&self, n: u32) -> String {
        format!("{}/page{}?{}", self.base, n, self.query)
    }

    /// URLs of pages `1..=total`
    pub fn pages(&self, total: u32) -> Vec<String> {
        (1..=total).map(|n| self.page(n)).collect()
    }
}

/// One-line human description of the filter
pub fn describe(filter: &ListingFilter) -> String {
    let mut summary = format!("{} - category {}", filter.platform, filter.category);

    match (filter.price.from, filter.price.to) {
        (Some(from), Some(to)) => summary.push_str(&format!(" - with price from {} to {}", from, to)),
        (Some(from), None) => summary.push_str(&format!(" - with price from {}", from)),
        (None, Some(to)) => summary.push_str(&format!(" - with price up to {}", to)),
        (None, None) => {}
    }

    let flags = filter.flags.params();
    if !flags.is_empty() {
        summary.push_str(&format!(" - ({})", flags.join(", ")));
    }

    summary
}
