//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and run the full crawl
//! cycle end-to-end.

use market_crawler::config::{
    Category, Config, CrawlerConfig, FilterFlags, ListingFilter, OutputConfig, Platform,
    PriceRange,
};
use market_crawler::crawler::Coordinator;
use market_crawler::output::{format_html_report, group_by_author};
use market_crawler::MarketError;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/en/market/mt5/expert";

/// Creates a test configuration pointed at the mock server
fn create_test_config(origin: &str) -> Config {
    Config {
        filter: ListingFilter {
            platform: Platform::Mt5,
            category: Category::Expert,
            price: PriceRange::default(),
            flags: FilterFlags::default(),
        },
        crawler: CrawlerConfig {
            origin: origin.to_string(),
            workers: 5,
            max_attempts: 3,
            // Very short for testing
            min_delay_ms: 1,
            max_delay_ms: 5,
            ..CrawlerConfig::default()
        },
        output: OutputConfig::default(),
    }
}

fn product_card(page: u32, slot: u32, author: &str) -> String {
    format!(
        r#"<div class="product-card">
            <a class="product-card__title" href="/en/market/product/p{page}-{slot}">Product {page}-{slot}</a>
            <a class="product-card__price">{price}.50 USD</a>
            <img class="product-card__main-logo" src="https://c.mql5.com/p{page}-{slot}.png">
            <span class="g-rating__info">4.{slot}</span>
            <div class="product-card__author">{author}</div>
            <div class="product-card__description">Page {page} slot {slot}</div>
        </div>"#,
        price = page * 10 + slot
    )
}

fn listing_page(cards: &[String], max_page: Option<u32>) -> String {
    let paginator = match max_page {
        Some(max) => {
            let links: String = (1..=max)
                .map(|n| format!(r#"<a href="{LISTING_PATH}/page{n}">{n}</a>"#))
                .collect();
            format!(r#"<div class="market-paginator-bottom">{links}<a>Next</a></div>"#)
        }
        None => String::new(),
    };

    format!(
        r#"<html><body><div class="marketTopLine">{}</div>{}</body></html>"#,
        cards.concat(),
        paginator
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Mounts the first page (with paginator) and `pages` numbered pages
async fn mount_listing(server: &MockServer, pages: u32, authors: &[&str]) {
    let first_cards = vec![product_card(1, 1, authors[0])];
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("count", "48"))
        .respond_with(html_response(listing_page(&first_cards, Some(pages))))
        .expect(1)
        .mount(server)
        .await;

    for page in 1..=pages {
        let cards = vec![
            product_card(page, 1, authors[(page as usize - 1) % authors.len()]),
            product_card(page, 2, authors[page as usize % authors.len()]),
        ];
        Mock::given(method("GET"))
            .and(path(format!("{LISTING_PATH}/page{page}")))
            .and(query_param("count", "48"))
            .respond_with(html_response(listing_page(&cards, Some(pages))))
            .expect(1)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_full_crawl_three_pages() {
    let server = MockServer::start().await;
    mount_listing(&server, 3, &["Ann", "Bob"]).await;

    let coordinator = Coordinator::new(create_test_config(&server.uri()))
        .expect("Failed to create coordinator")
        .with_progress(false);
    let outcome = coordinator.run().await.expect("Crawl failed");

    assert_eq!(outcome.pages, 3);
    assert_eq!(outcome.records.len(), 6);

    let mut names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "Product 1-1",
            "Product 1-2",
            "Product 2-1",
            "Product 2-2",
            "Product 3-1",
            "Product 3-2"
        ]
    );

    for record in &outcome.records {
        assert!(record.link.starts_with(&server.uri()));
        assert!(record.price > 0.0);
        assert_ne!(record.rating, "N/A");
    }

    let groups = group_by_author(outcome.records.clone());
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.total_products(), 6);
    assert_eq!(groups.get("Ann").unwrap().products.len(), 3);
    assert_eq!(groups.get("Bob").unwrap().products.len(), 3);

    let html = format_html_report(&groups, "test");
    assert_eq!(html.matches("class=\"product-row\"").count(), 6);
}

#[tokio::test]
async fn test_pool_larger_than_page_count() {
    let server = MockServer::start().await;
    mount_listing(&server, 4, &["Ann", "Bob", "Cid"]).await;

    let coordinator = Coordinator::new(create_test_config(&server.uri()))
        .unwrap()
        .with_progress(false);
    let outcome = coordinator.run().await.unwrap();

    assert_eq!(outcome.pages, 4);
    assert_eq!(outcome.records.len(), 8);
    for page in 1..=4 {
        for slot in 1..=2 {
            let name = format!("Product {page}-{slot}");
            assert!(outcome.records.iter().any(|r| r.name == name), "missing {name}");
        }
    }
}

#[tokio::test]
async fn test_single_page_without_paginator() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html_response(listing_page(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page1")))
        .respond_with(html_response(listing_page(
            &[product_card(1, 1, "Ann")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = Coordinator::new(create_test_config(&server.uri()))
        .unwrap()
        .with_progress(false)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.pages, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].author, "Ann");
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html_response(listing_page(&[], Some(1))))
        .mount(&server)
        .await;

    // First request for page 1 fails, the next one succeeds
    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page1")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page1")))
        .respond_with(html_response(listing_page(
            &[product_card(1, 1, "Ann"), product_card(1, 2, "Ann")],
            Some(1),
        )))
        .with_priority(2)
        .mount(&server)
        .await;

    let outcome = Coordinator::new(create_test_config(&server.uri()))
        .unwrap()
        .with_progress(false)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 2);
}

#[tokio::test]
async fn test_exhausted_retries_abort_the_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html_response(listing_page(&[], Some(2))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page1")))
        .respond_with(html_response(listing_page(
            &[product_card(1, 1, "Ann")],
            Some(2),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // Page 2 never recovers: all three attempts are made
    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page2")))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let result = Coordinator::new(create_test_config(&server.uri()))
        .unwrap()
        .with_progress(false)
        .run()
        .await;

    match result {
        Err(MarketError::RetriesExhausted { url, attempts, .. }) => {
            assert!(url.contains("/page2?"));
            assert_eq!(attempts, 3);
        }
        other => panic!("expected exhaustion error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_waits_for_in_flight_pages() {
    let server = MockServer::start().await;
    let slow = Duration::from_millis(500);

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html_response(listing_page(&[], Some(2))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page1")))
        .respond_with(
            html_response(listing_page(&[product_card(1, 1, "Ann")], Some(2))).set_delay(slow),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Page 2 exhausts its attempts long before page 1 is served
    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page2")))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(&server.uri()))
        .unwrap()
        .with_progress(false);

    let start = Instant::now();
    let result = coordinator.run().await;
    let elapsed = start.elapsed();

    assert!(
        matches!(result, Err(MarketError::RetriesExhausted { ref url, .. }) if url.contains("/page2?")),
        "unexpected result: {result:?}"
    );
    assert!(elapsed >= slow, "returned after {elapsed:?}, before page 1 finished");
}

#[tokio::test]
async fn test_discovery_failure_aborts_before_dispatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let result = Coordinator::new(create_test_config(&server.uri()))
        .unwrap()
        .with_progress(false)
        .run()
        .await;

    assert!(matches!(
        result,
        Err(MarketError::RetriesExhausted { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn test_invalid_price_is_fatal_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html_response(listing_page(&[], Some(1))))
        .mount(&server)
        .await;

    let bad_card = r#"<div class="product-card">
        <a class="product-card__title" href="/en/market/product/x">Broken</a>
        <a class="product-card__price">Free</a>
        <img class="product-card__main-logo" src="https://c.mql5.com/x.png">
    </div>"#
        .to_string();

    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page1")))
        .respond_with(html_response(listing_page(&[bad_card], Some(1))))
        .expect(1)
        .mount(&server)
        .await;

    let result = Coordinator::new(create_test_config(&server.uri()))
        .unwrap()
        .with_progress(false)
        .run()
        .await;

    assert!(matches!(result, Err(MarketError::Parse { .. })));
}

#[tokio::test]
async fn test_filter_query_is_sent() {
    let server = MockServer::start().await;

    let mut config = create_test_config(&server.uri());
    config.filter.price = PriceRange {
        from: Some(10.0),
        to: Some(100.0),
    };
    config.filter.flags = FilterFlags {
        rating: true,
        has_reviews: true,
        has_rent: false,
    };

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("PriceFrom", "10"))
        .and(query_param("PriceTo", "100"))
        .and(query_param("count", "48"))
        .and(query_param("Rating", "on"))
        .and(query_param("HasReviews", "on"))
        .respond_with(html_response(listing_page(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{LISTING_PATH}/page1")))
        .and(query_param("PriceFrom", "10"))
        .and(query_param("Rating", "on"))
        .respond_with(html_response(listing_page(&[], None)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = Coordinator::new(config)
        .unwrap()
        .with_progress(false)
        .run()
        .await
        .unwrap();

    assert!(outcome.records.is_empty());
}
