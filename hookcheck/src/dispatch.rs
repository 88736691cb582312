//! Build, sign and send the single test delivery.
//!
//! ```text
//! WebhookRequest::build()
//!   ├─ serialize TestOrder     // exact body bytes
//!   ├─ sign_payload()          // HMAC-SHA256 over those bytes
//!   └─ X-Shopify-* headers
//! Dispatcher::send()
//!   ├─ POST, one attempt, client-wide timeout
//!   └─ DeliveryOutcome
//!        ├─ Received        any status, body read to the end
//!        ├─ NoResponse      timeout / connect / transport failure
//!        └─ InvalidRequest  rejected before anything went on the wire
//! ```
//!
//! A non-2xx status is still `Received`: the endpoint answered, which is what a completed
//! run means. Only the report distinguishes it.

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::errors::{Error, Result};
use crate::payload::TestOrder;
use crate::prompt::RunInputs;
use crate::signing;

/// Topic announced in `X-Shopify-Topic`
pub const TOPIC: &str = "orders/create";

pub const HEADER_TOPIC: &str = "X-Shopify-Topic";
pub const HEADER_SHOP_DOMAIN: &str = "X-Shopify-Shop-Domain";
pub const HEADER_HMAC: &str = "X-Shopify-Hmac-Sha256";
pub const HEADER_WEBHOOK_ID: &str = "X-Shopify-Webhook-Id";

/// A signed webhook HTTP request ready to send.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl WebhookRequest {
    /// Serialize `order`, sign it with the run secret and attach the Shopify headers.
    ///
    /// `sent_at` supplies the `test-<epoch-millis>` webhook id.
    pub fn build(inputs: &RunInputs, order: &TestOrder, sent_at: DateTime<Utc>) -> Result<Self> {
        let body = order.to_json()?;
        let signature = signing::sign_payload(&body, &inputs.secret).ok_or(Error::Signing)?;

        Ok(Self {
            url: inputs.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (HEADER_TOPIC.to_string(), TOPIC.to_string()),
                (HEADER_SHOP_DOMAIN.to_string(), inputs.shop_domain.clone()),
                (HEADER_HMAC.to_string(), signature),
                (HEADER_WEBHOOK_ID.to_string(), format!("test-{}", sent_at.timestamp_millis())),
            ],
            body,
        })
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn signature(&self) -> Option<&str> {
        self.header(HEADER_HMAC)
    }
}

/// Why no response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResponseKind {
    /// Nothing arrived within the configured timeout
    Timeout,
    /// DNS resolution or TCP/TLS connect failed
    Connect,
    /// The connection broke while sending or reading
    Other,
}

/// Outcome of the single delivery attempt.
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    /// The endpoint answered, with any status
    Received {
        status: u16,
        /// Standard reason phrase for `status`, `None` for unregistered codes. reqwest does
        /// not expose the phrase the server actually wrote on the status line.
        reason: Option<String>,
        body: String,
        elapsed: Duration,
    },
    /// The request was attempted but no complete response came back
    NoResponse { kind: NoResponseKind, error: String },
    /// The request could not be built, e.g. a malformed URL or header value
    InvalidRequest { error: String },
}

impl DeliveryOutcome {
    /// A 2xx response
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Received { status, .. } if (200..300).contains(status))
    }
}

/// Sends webhook requests with a bounded wait.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
}

impl Dispatcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self { client })
    }

    /// Send `request` once. Never retries, never fails: every failure is an outcome.
    pub async fn send(&self, request: WebhookRequest) -> DeliveryOutcome {
        tracing::debug!(url = %request.url, bytes = request.body.len(), "Sending webhook HTTP request");

        let mut req_builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }
        req_builder = req_builder.body(request.body);

        let start = Instant::now();
        let response = match req_builder.send().await {
            Ok(response) => response,
            Err(e) => return outcome_from_error(&e),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return outcome_from_error(&e),
        };
        let elapsed = start.elapsed();

        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Webhook response received"
        );

        DeliveryOutcome::Received {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
            elapsed,
        }
    }
}

fn outcome_from_error(err: &reqwest::Error) -> DeliveryOutcome {
    let error = error_chain(err);

    if err.is_builder() {
        tracing::warn!(error = %error, "Webhook request could not be built");
        return DeliveryOutcome::InvalidRequest { error };
    }

    let kind = if err.is_timeout() {
        NoResponseKind::Timeout
    } else if err.is_connect() {
        NoResponseKind::Connect
    } else {
        NoResponseKind::Other
    };

    tracing::warn!(kind = ?kind, error = %error, "No response from webhook endpoint");
    DeliveryOutcome::NoResponse { kind, error }
}

/// `reqwest` keeps the useful part (DNS, refused, TLS) in the source chain.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
