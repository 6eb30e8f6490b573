//! Configuration module for Market-Crawler
//!
//! This module holds the structured crawl configuration, its validation and
//! the listing URL construction derived from it.
//!
//! # Example
//!
//! ```no_run
//! use market_crawler::config::{
//!     validate, Category, Config, CrawlerConfig, FilterFlags, ListingFilter, ListingUrls,
//!     OutputConfig, Platform, PriceRange,
//! };
//!
//! let config = Config {
//!     filter: ListingFilter {
//!         platform: Platform::Mt5,
//!         category: Category::Expert,
//!         price: PriceRange::default(),
//!         flags: FilterFlags::default(),
//!     },
//!     crawler: CrawlerConfig::default(),
//!     output: OutputConfig::default(),
//! };
//! validate(&config).unwrap();
//! println!("First page: {}", ListingUrls::new(&config).first_page());
//! ```

mod query;
mod types;
mod validation;

// Re-export types
pub use types::{
    Category, Config, CrawlerConfig, FilterFlags, ListingFilter, OutputConfig, Platform,
    PriceRange, DEFAULT_ORIGIN, PAGE_SIZE,
};

pub use query::{base_url, describe, filter_query, ListingUrls};
pub use validation::validate;
