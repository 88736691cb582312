//! End-to-end runs against mocked receivers, driven through [`crate::run`] exactly as the
//! binary drives it, with scripted terminal answers.

use std::time::Duration;

use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::dispatch::{HEADER_HMAC, HEADER_SHOP_DOMAIN, HEADER_TOPIC};
use crate::prompt::Question;
use crate::{Config, DeliveryOutcome, Error, NoResponseKind, ScriptedPrompter, run, signing};

const SECRET: &str = "shpss_e2e_secret";

async fn run_captured(config: &Config, prompter: &mut ScriptedPrompter) -> (crate::Result<DeliveryOutcome>, String) {
    let mut out = Vec::new();
    let result = run(config, prompter, &mut out).await;
    (result, String::from_utf8(out).expect("report is utf-8"))
}

/// Answers for endpoint, secret and shop domain, in prompt order
fn answers(endpoint: &str) -> ScriptedPrompter {
    ScriptedPrompter::new([endpoint, SECRET, "e2e.myshopify.com"])
}

#[test_log::test(tokio::test)]
async fn test_e2e_receiver_accepts_signed_webhook() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/shopifyWebhook"))
        .and(header(HEADER_TOPIC, "orders/create"))
        .and(header(HEADER_SHOP_DOMAIN, "e2e.myshopify.com"))
        .and(header_exists(HEADER_HMAC))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut prompter = answers(&format!("{}/shopifyWebhook", mock_server.uri()));
    let (result, report) = run_captured(&Config::default(), &mut prompter).await;

    let outcome = result.expect("run completes");
    assert!(outcome.is_success());
    assert_eq!(prompter.asked(), [Question::Endpoint, Question::Secret, Question::ShopDomain]);

    // What the receiver got must verify with the shared secret
    let received = mock_server.received_requests().await.expect("recording enabled");
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    let signature = received[0].headers.get("x-shopify-hmac-sha256").unwrap().to_str().unwrap();
    assert!(signing::verify_signature(&body, signature, SECRET));
    assert!(!signing::verify_signature(&body, signature, "wrong-secret"));

    let webhook_id = received[0].headers.get("x-shopify-webhook-id").unwrap().to_str().unwrap();
    assert!(webhook_id.starts_with("test-"));
    assert!(webhook_id["test-".len()..].parse::<i64>().is_ok());

    let order: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["id"], 123456789);
    assert_eq!(order["currency"], "CLP");

    assert!(report.contains("SHOPIFY WEBHOOK TEST"));
    assert!(report.contains(&format!("Data size: {} bytes", body.len())));
    assert!(report.contains(&format!("HMAC: {}", signing::preview(signature))));
    assert!(report.contains("Webhook is working correctly!"));
}

#[test_log::test(tokio::test)]
async fn test_e2e_server_error_completes_run() {
    let mock_server = MockServer::start().await;
    let long_body = format!("{{\"error\":\"invalid hmac\",\"detail\":\"{}\"}}", "z".repeat(500));
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(long_body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut prompter = answers(&mock_server.uri());
    let (result, report) = run_captured(&Config::default(), &mut prompter).await;

    assert!(matches!(result, Ok(DeliveryOutcome::Received { status: 500, .. })));
    assert!(report.contains("Status: 500"));
    assert!(report.contains("Status text: Internal Server Error"));
    assert!(report.contains("Full error: Request failed with status code 500"));
    assert!(report.contains(r#"Response: {"detail":"zzz"#) || report.contains(r#"Response: {"error":"invalid hmac""#));
    assert!(!report.contains(&"z".repeat(500)));
}

#[test_log::test(tokio::test)]
async fn test_e2e_timeout_reports_no_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = Config {
        timeout: Duration::from_millis(250),
        ..Default::default()
    };
    let mut prompter = answers(&mock_server.uri());
    let (result, report) = run_captured(&config, &mut prompter).await;

    assert!(matches!(
        result,
        Ok(DeliveryOutcome::NoResponse {
            kind: NoResponseKind::Timeout,
            ..
        })
    ));
    assert!(report.contains("No response received from the server"));
    assert!(report.contains("That the function is deployed"));
    assert!(!report.contains("Status:"));
}

#[test_log::test(tokio::test)]
async fn test_e2e_invalid_url_reports_construction_error() {
    let mut prompter = answers("definitely not a url");
    let (result, report) = run_captured(&Config::default(), &mut prompter).await;

    assert!(matches!(result, Ok(DeliveryOutcome::InvalidRequest { .. })));
    assert!(report.contains("ERROR SENDING WEBHOOK"));
    assert!(report.contains("Error: "));
    assert!(!report.contains("Check:"));
}

#[test_log::test(tokio::test)]
async fn test_e2e_configured_inputs_skip_prompts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header(HEADER_SHOP_DOMAIN, "configured.myshopify.com"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config {
        endpoint: Some(mock_server.uri()),
        secret: Some(SECRET.to_string()),
        shop_domain: Some("configured.myshopify.com".to_string()),
        ..Default::default()
    };
    let mut prompter = ScriptedPrompter::default();
    let (result, report) = run_captured(&config, &mut prompter).await;

    assert!(result.expect("run completes").is_success());
    assert!(prompter.asked().is_empty());
    assert!(report.contains("Webhook responded with status 204"));
}

#[test_log::test(tokio::test)]
async fn test_e2e_closed_terminal_is_fatal() {
    let mut prompter = ScriptedPrompter::new(["http://127.0.0.1:1"]);
    let (result, report) = run_captured(&Config::default(), &mut prompter).await;

    assert!(matches!(result, Err(Error::Prompt { .. })));
    // Nothing was sent, so nothing past the banner was printed
    assert!(!report.contains("Sending test webhook"));
}
