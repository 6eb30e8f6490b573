//! Run statistics
//!
//! This module summarizes a finished crawl for display on the terminal.

use crate::crawler::NOT_AVAILABLE;
use crate::output::group::AuthorGroups;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    /// Number of listing pages crawled
    pub pages: u32,

    /// Total number of records
    pub products: usize,

    /// Number of distinct authors
    pub authors: usize,

    /// Records without a rating
    pub unrated: usize,

    /// Lowest price seen
    pub min_price: Option<f64>,

    /// Highest price seen
    pub max_price: Option<f64>,

    /// Mean price
    pub mean_price: Option<f64>,

    /// Wall-clock crawl duration
    pub elapsed: Duration,
}

impl RunStatistics {
    /// Computes statistics from grouped records
    pub fn from_groups(pages: u32, elapsed: Duration, groups: &AuthorGroups) -> Self {
        let prices: Vec<f64> = groups
            .iter()
            .flat_map(|group| group.products.iter().map(|p| p.price))
            .collect();

        let unrated = groups
            .iter()
            .flat_map(|group| group.products.iter())
            .filter(|p| p.rating == NOT_AVAILABLE)
            .count();

        let min_price = prices.iter().copied().reduce(f64::min);
        let max_price = prices.iter().copied().reduce(f64::max);
        let mean_price = if prices.is_empty() {
            None
        } else {
            Some(prices.iter().sum::<f64>() / prices.len() as f64)
        };

        Self {
            pages,
            products: prices.len(),
            authors: groups.len(),
            unrated,
            min_price,
            max_price,
            mean_price,
            elapsed,
        }
    }

    /// Average number of records per page
    pub fn products_per_page(&self) -> f64 {
        if self.pages == 0 {
            return 0.0;
        }
        self.products as f64 / self.pages as f64
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Crawl Statistics ===\n");
    println!("Pages crawled: {}", stats.pages);
    println!(
        "Products: {} ({:.1} per page)",
        stats.products,
        stats.products_per_page()
    );
    println!("Authors: {}", stats.authors);
    println!("Unrated products: {}", stats.unrated);

    if let (Some(min), Some(max), Some(mean)) = (stats.min_price, stats.max_price, stats.mean_price)
    {
        println!("Price range: {:.2} - {:.2} USD (mean {:.2})", min, max, mean);
    }

    println!("Duration: {:.1}s", stats.elapsed.as_secs_f64());
}
