//! Page count discovery
//!
//! The bottom paginator of the first listing page links to numbered pages;
//! the highest number is the page count.

use crate::crawler::parser::{element_text, selector};
use crate::ParseError;
use scraper::Html;

const PAGINATOR: &str = "div.market-paginator-bottom";
const PAGINATOR_LINK: &str = "a";

/// Upper bound on the page count taken from a paginator
pub const MAX_PAGES: u32 = 10_000;

/// Determines the number of listing pages from the first page's markup
///
/// Returns 1 when the paginator is missing or holds no numeric links
/// (a single page of results renders no usable paginator). Counts above
/// [`MAX_PAGES`] are capped.
///
/// # Example
///
/// ```
/// use market_crawler::crawler::discover_page_count;
///
/// let html = r#"<div class="market-paginator-bottom">
///     <a>1</a><a>2</a><a>3</a><a>…</a><a>7</a><a>Next</a>
/// </div>"#;
/// assert_eq!(discover_page_count(html).unwrap(), 7);
/// ```
pub fn discover_page_count(html: &str) -> Result<u32, ParseError> {
    let document = Html::parse_document(html);

    let paginator = match document.select(&selector(PAGINATOR)?).next() {
        Some(paginator) => paginator,
        None => {
            tracing::debug!("No paginator found, assuming a single page");
            return Ok(1);
        }
    };

    let max_page = paginator
        .select(&selector(PAGINATOR_LINK)?)
        .map(element_text)
        .filter(|text| !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
        // Only overflow can fail once the text is all digits
        .map(|text| text.parse::<u32>().unwrap_or(u32::MAX))
        .max();

    match max_page {
        Some(pages) if pages > MAX_PAGES => {
            tracing::warn!("Paginator reports more than {} pages, capping", MAX_PAGES);
            Ok(MAX_PAGES)
        }
        Some(pages) => Ok(pages.max(1)),
        None => {
            tracing::warn!("Paginator has no numeric links, assuming a single page");
            Ok(1)
        }
    }
}
