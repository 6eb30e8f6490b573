use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

/// Origin every product link and listing URL is built on
pub const DEFAULT_ORIGIN: &str = "https://www.mql5.com";

/// Number of product cards requested per listing page
pub const PAGE_SIZE: u32 = 48;

/// Main configuration structure for Market-Crawler
#[derive(Debug, Clone)]
pub struct Config {
    pub filter: ListingFilter,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Trading platform the listing belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Platform {
    Mt4,
    Mt5,
}

impl Platform {
    /// Path segment used by the market URLs
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Mt4 => "mt4",
            Self::Mt5 => "mt5",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mt4 => write!(f, "MT4"),
            Self::Mt5 => write!(f, "MT5"),
        }
    }
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Category {
    Expert,
    Indicator,
    Library,
    Utility,
}

impl Category {
    /// Path segment used by the market URLs
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Expert => "expert",
            Self::Indicator => "indicator",
            Self::Library => "library",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Optional price bounds, both ends inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

/// Boolean listing filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterFlags {
    /// Only products that have a rating
    pub rating: bool,

    /// Only products with reviews
    pub has_reviews: bool,

    /// Only products available for rent
    pub has_rent: bool,
}

impl FilterFlags {
    /// Query parameters for the enabled flags, in the order the market expects
    pub fn params(&self) -> Vec<&'static str> {
        let mut params = Vec::new();
        if self.rating {
            params.push("Rating=on");
        }
        if self.has_reviews {
            params.push("HasReviews=on");
        }
        if self.has_rent {
            params.push("HasRent=on");
        }
        params
    }
}

/// Which slice of the market to crawl
#[derive(Debug, Clone)]
pub struct ListingFilter {
    pub platform: Platform,
    pub category: Category,
    pub price: PriceRange,
    pub flags: FilterFlags,
}

/// Crawler behavior configuration
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Scheme and host of the marketplace
    pub origin: String,

    /// Language path segment ("en")
    pub language: String,

    /// Number of pages fetched concurrently
    pub workers: usize,

    /// Attempts per URL before giving up
    pub max_attempts: u32,

    /// Lower bound of the random delay between attempts (milliseconds)
    pub min_delay_ms: u64,

    /// Upper bound of the random delay between attempts (milliseconds)
    pub max_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            language: "en".to_string(),
            workers: 5,
            max_attempts: 3,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Path of the generated HTML report
    pub report_path: PathBuf,

    /// Optional path for a JSON dump of every record
    pub json_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("product_list.html"),
            json_path: None,
        }
    }
}
