//! Listing page parser
//!
//! This module extracts product cards from one page of market listings.
//! A card yields a [`ProductRecord`]; the title link, price and image are
//! required, while rating, author and description fall back to `"N/A"`.

use crate::ParseError;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// Value recorded for optional fields absent from a card
pub const NOT_AVAILABLE: &str = "N/A";

const LISTING_CONTAINER: &str = "div.marketTopLine";
const PRODUCT_CARD: &str = "div.product-card";
const CARD_TITLE: &str = "a.product-card__title";
const CARD_PRICE: &str = "a.product-card__price";
const CARD_IMAGE: &str = "img.product-card__main-logo";
const CARD_RATING: &str = "span.g-rating__info";
const CARD_AUTHOR: &str = "div.product-card__author";
const CARD_DESCRIPTION: &str = "div.product-card__description";

/// Currency token trailing every listed price
const CURRENCY_SUFFIX: &str = "USD";

/// One scraped product listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    /// Product title
    pub name: String,

    /// Absolute product URL on the market origin
    pub link: String,

    /// Price in USD
    pub price: f64,

    /// Main logo URL
    pub image: String,

    /// Rating text, or "N/A"
    pub rating: String,

    /// Seller name, or "N/A"
    pub author: String,

    /// Short description, or "N/A"
    pub description: String,
}

/// Compiles a CSS selector
pub(crate) fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        css,
        message: format!("{:?}", e),
    })
}

/// Collects an element's text with runs of whitespace collapsed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a listing price such as `"12.50 USD"` or `"1 234 USD"`
///
/// The trailing currency token is removed, then every whitespace character
/// (including non-breaking spaces used as thousands separators), and the rest
/// must parse as a finite, non-negative number.
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let without_currency = trimmed.strip_suffix(CURRENCY_SUFFIX).unwrap_or(trimmed);

    let digits: String = without_currency
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if digits.is_empty() {
        return None;
    }

    digits
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
}

/// Parses a listing page into product records
///
/// # Arguments
///
/// * `html` - The page markup
/// * `origin` - Market origin used to absolutize product links
///
/// # Returns
///
/// * `Ok(Vec<ProductRecord>)` - Records in document order; empty when the
///   listing container is missing
/// * `Err(ParseError)` - A card lacks a required field or has a bad price
///
/// # Example
///
/// ```
/// use market_crawler::crawler::parse_products;
/// use url::Url;
///
/// let html = r#"<div class="marketTopLine"><div class="product-card">
///     <a class="product-card__title" href="/en/market/product/1">Grid EA</a>
///     <a class="product-card__price">49.00 USD</a>
///     <img class="product-card__main-logo" src="https://c.mql5.com/logo.png">
/// </div></div>"#;
/// let origin = Url::parse("https://www.mql5.com").unwrap();
/// let records = parse_products(html, &origin).unwrap();
/// assert_eq!(records[0].link, "https://www.mql5.com/en/market/product/1");
/// assert_eq!(records[0].rating, "N/A");
/// ```
pub fn parse_products(html: &str, origin: &Url) -> Result<Vec<ProductRecord>, ParseError> {
    let document = Html::parse_document(html);

    let container = match document.select(&selector(LISTING_CONTAINER)?).next() {
        Some(container) => container,
        None => {
            tracing::debug!("No listing container found");
            return Ok(Vec::new());
        }
    };

    let selectors = CardSelectors::new()?;

    container
        .select(&selector(PRODUCT_CARD)?)
        .enumerate()
        .map(|(index, card)| parse_card(card, index, origin, &selectors))
        .collect()
}

/// Pre-compiled selectors for the fields of one card
struct CardSelectors {
    title: Selector,
    price: Selector,
    image: Selector,
    rating: Selector,
    author: Selector,
    description: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self, ParseError> {
        Ok(Self {
            title: selector(CARD_TITLE)?,
            price: selector(CARD_PRICE)?,
            image: selector(CARD_IMAGE)?,
            rating: selector(CARD_RATING)?,
            author: selector(CARD_AUTHOR)?,
            description: selector(CARD_DESCRIPTION)?,
        })
    }
}

fn parse_card(
    card: ElementRef<'_>,
    index: usize,
    origin: &Url,
    selectors: &CardSelectors,
) -> Result<ProductRecord, ParseError> {
    let title = card
        .select(&selectors.title)
        .next()
        .ok_or(ParseError::MissingField { field: "title", index })?;

    let name = element_text(title);
    if name.is_empty() {
        return Err(ParseError::MissingField { field: "title", index });
    }

    let href = title
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or(ParseError::MissingField { field: "link", index })?;

    let invalid_link = || ParseError::InvalidLink {
        href: href.to_string(),
        index,
    };

    // Absolute and protocol-relative hrefs may point off the market
    let link = origin.join(href).map_err(|_| invalid_link())?;
    if link.origin() != origin.origin() {
        return Err(invalid_link());
    }
    let link = link.to_string();

    let raw_price = card
        .select(&selectors.price)
        .next()
        .map(element_text)
        .ok_or(ParseError::MissingField { field: "price", index })?;

    let price = parse_price(&raw_price).ok_or(ParseError::InvalidPrice {
        raw: raw_price.clone(),
        index,
    })?;

    let image = card
        .select(&selectors.image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .ok_or(ParseError::MissingField { field: "image", index })?
        .to_string();

    Ok(ProductRecord {
        name,
        link,
        price,
        image,
        rating: optional_text(card, &selectors.rating),
        author: optional_text(card, &selectors.author),
        description: optional_text(card, &selectors.description),
    })
}

fn optional_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
