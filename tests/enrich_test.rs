// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Enrichment Tests
 * WHOIS/TLS lookup summaries and failure degradation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use kalastaja_scanner::enrich::{DomainEnricher, LookupApiEnricher};
use kalastaja_scanner::errors::ScannerError;
use kalastaja_scanner::safebrowsing::SafeBrowsingClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn whois_summary_extracts_registrar_and_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whois"))
        .and(query_param("domainName", "scam.example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "WhoisRecord": {
                "registrarName": "Demo Registrar Inc",
                "createdDate": "2026-07-01T00:00:00Z",
                "expiresDate": "2027-07-01T00:00:00Z"
            }
        })))
        .mount(&server)
        .await;

    let enricher = LookupApiEnricher::new(Some("key".to_string()))
        .unwrap()
        .with_base_urls(
            &format!("{}/whois", server.uri()),
            &format!("{}/tls", server.uri()),
        );

    let summary = enricher.whois("scam.example").await.unwrap();
    assert!(summary.contains("Demo Registrar Inc"));
    assert!(summary.contains("2026-07-01"));
}

#[tokio::test]
async fn tls_summary_extracts_certificate_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "certificates": [{
                "subject": { "commonName": "scam.example" },
                "issuer": { "commonName": "Demo CA" },
                "validTo": "2027-01-01"
            }]
        })))
        .mount(&server)
        .await;

    let enricher = LookupApiEnricher::new(Some("key".to_string()))
        .unwrap()
        .with_base_urls(
            &format!("{}/whois", server.uri()),
            &format!("{}/tls", server.uri()),
        );

    let summary = enricher.tls("scam.example").await.unwrap();
    assert!(summary.contains("Demo CA"));
    assert!(summary.contains("scam.example"));
}

#[tokio::test]
async fn missing_api_key_fails_fast_as_enrichment_error() {
    let enricher = LookupApiEnricher::new(None).unwrap();
    let result = enricher.whois("scam.example").await;

    assert!(matches!(result, Err(ScannerError::Enrichment { .. })));
}

#[tokio::test]
async fn lookup_http_error_is_an_enrichment_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whois"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let enricher = LookupApiEnricher::new(Some("key".to_string()))
        .unwrap()
        .with_base_urls(
            &format!("{}/whois", server.uri()),
            &format!("{}/tls", server.uri()),
        );

    assert!(matches!(
        enricher.whois("scam.example").await,
        Err(ScannerError::Enrichment { .. })
    ));
}

#[tokio::test]
async fn threat_match_reports_confirmed_types() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/threatMatches:find"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "matches": [
                { "threatType": "SOCIAL_ENGINEERING", "platformType": "ANY_PLATFORM" }
            ]
        })))
        .mount(&server)
        .await;

    let client = SafeBrowsingClient::new("key".to_string())
        .unwrap()
        .with_base_url(&server.uri());

    let threats = client.check_url("http://scam.example").await.unwrap();
    assert_eq!(threats, vec!["SOCIAL_ENGINEERING".to_string()]);
}

#[tokio::test]
async fn clean_url_has_no_matches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/threatMatches:find"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = SafeBrowsingClient::new("key".to_string())
        .unwrap()
        .with_base_url(&server.uri());

    let threats = client.check_url("http://good.example").await.unwrap();
    assert!(threats.is_empty());
}
