//! # hookcheck: manual check of a Shopify webhook receiver
//!
//! `hookcheck` sends one synthetic `orders/create` notification, signed the way Shopify signs
//! its webhooks, to an endpoint of your choice and reports how the endpoint answered. It is
//! meant for the moment after deploying a receiver: did it accept a correctly signed payload?
//!
//! ## Flow
//!
//! A run is strictly linear and happens once:
//!
//! 1. **Collect inputs** ([`prompt`]) - endpoint URL, shared secret and shop domain, taken from
//!    flags/config/environment ([`config`]) or asked for on the terminal.
//! 2. **Sign** ([`signing`]) - base64 HMAC-SHA256 of the JSON test order ([`payload`]).
//! 3. **Send** ([`dispatch`]) - a single POST with the `X-Shopify-*` headers and a bounded
//!    wait (30 seconds unless configured otherwise).
//! 4. **Report** ([`report`]) - coloured summary of the response, or of why there was none.
//!
//! Whatever the endpoint does, a run that got as far as reporting has completed; only errors
//! that stop the run before that point ([`errors::Error`]) make the binary exit non-zero.

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod payload;
pub mod prompt;
pub mod report;
pub mod signing;
pub mod telemetry;

#[cfg(test)]
mod test;

use std::io::Write;

use chrono::Utc;

pub use config::Config;
pub use dispatch::{DeliveryOutcome, Dispatcher, NoResponseKind, WebhookRequest};
pub use errors::{Error, Result};
pub use payload::TestOrder;
pub use prompt::{Prompter, RunInputs, ScriptedPrompter, TerminalPrompter};

/// Run one webhook check: collect inputs, sign, send, report.
///
/// The report is written to `out`. The returned outcome is informational; every variant,
/// including server errors and timeouts, means the run completed.
pub async fn run<W: Write>(config: &Config, prompter: &mut dyn Prompter, out: &mut W) -> Result<DeliveryOutcome> {
    out.write_all(report::render_banner().as_bytes())?;
    out.flush()?;

    let inputs = prompt::collect_inputs(config, prompter)?;
    tracing::debug!(?inputs, "Collected run inputs");

    let now = Utc::now();
    let order = TestOrder::sample(now);
    let request = WebhookRequest::build(&inputs, &order, now)?;

    out.write_all(report::render_preamble(&request).as_bytes())?;
    out.flush()?;

    let dispatcher = Dispatcher::new(config.timeout)?;
    let outcome = dispatcher.send(request).await;

    out.write_all(report::render_outcome(&outcome, config.body_preview_chars).as_bytes())?;
    out.flush()?;

    Ok(outcome)
}
