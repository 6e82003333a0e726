// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Threat Feed Tests
 * CSV feed parsing and the bounded retry budget
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use kalastaja_scanner::feeds::ThreatFeedClient;
use kalastaja_scanner::retry::RetryConfig;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED_CSV: &str = "phish_id,url,submission_time\n\
    1,http://scam-one.example/login,2026-01-01\n\
    2,http://scam-two.example/,2026-01-02\n\
    3,http://scam-one.example/login,2026-01-03\n";

fn fast_retry() -> RetryConfig {
    RetryConfig::default()
        .with_max_attempts(3)
        .with_initial_backoff(Duration::from_millis(1))
}

#[tokio::test]
async fn parses_unique_urls_from_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED_CSV))
        .mount(&server)
        .await;

    let client = ThreatFeedClient::new(format!("{}/feed.csv", server.uri()))
        .unwrap()
        .with_retry(fast_retry());
    let urls = client.fetch_known_phishing_urls().await.unwrap();

    assert_eq!(
        urls,
        vec![
            "http://scam-one.example/login".to_string(),
            "http://scam-two.example/".to_string(),
        ]
    );
}

#[tokio::test]
async fn recovers_from_transient_unavailability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.csv"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feed.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED_CSV))
        .mount(&server)
        .await;

    let client = ThreatFeedClient::new(format!("{}/feed.csv", server.uri()))
        .unwrap()
        .with_retry(fast_retry());
    let urls = client.fetch_known_phishing_urls().await.unwrap();

    assert_eq!(urls.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn gives_up_after_the_attempt_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.csv"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ThreatFeedClient::new(format!("{}/feed.csv", server.uri()))
        .unwrap()
        .with_retry(fast_retry().with_max_attempts(2));
    let result = client.fetch_known_phishing_urls().await;

    assert!(result.is_err());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn feed_without_url_column_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id,name\n1,foo\n"))
        .mount(&server)
        .await;

    let client = ThreatFeedClient::new(format!("{}/feed.csv", server.uri()))
        .unwrap()
        .with_retry(fast_retry());

    assert!(client.fetch_known_phishing_urls().await.is_err());
}
