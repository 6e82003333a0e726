// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Alert Delivery Tests
 * Webhook fan-out behavior, including failure tolerance
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use kalastaja_scanner::alerting::{AlertSink, WebhookAlerter};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn delivers_message_as_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_partial_json(serde_json::json!({
            "text": "High risk detected: http://scam.example (score 0.85)"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let alerter = WebhookAlerter::new(format!("{}/hook", server.uri())).unwrap();
    alerter
        .alert("High risk detected: http://scam.example (score 0.85)")
        .await;
}

#[tokio::test]
async fn failed_delivery_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let alerter = WebhookAlerter::new(format!("{}/hook", server.uri())).unwrap();
    // non-success is logged and dropped; this must simply return
    alerter.alert("anything").await;
}

#[tokio::test]
async fn unreachable_sink_is_swallowed() {
    let alerter = WebhookAlerter::new("http://127.0.0.1:1/hook".to_string()).unwrap();
    alerter.alert("anything").await;
}
