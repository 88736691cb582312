//! Terminal rendering of the run.
//!
//! Everything here produces a `String` so the wording can be asserted on; the caller decides
//! where it is written.

use std::fmt;

use colored::Colorize;

use crate::dispatch::{DeliveryOutcome, NoResponseKind, WebhookRequest};
use crate::signing;

#[derive(Default)]
struct Lines(Vec<String>);

impl Lines {
    fn push(&mut self, line: impl fmt::Display) {
        self.0.push(line.to_string());
    }

    fn blank(&mut self) {
        self.0.push(String::new());
    }

    fn finish(self) -> String {
        let mut text = self.0.join("\n");
        text.push('\n');
        text
    }
}

/// Title shown before prompting.
pub fn render_banner() -> String {
    let mut lines = Lines::default();
    lines.blank();
    lines.push(format!("hookcheck {}", env!("CARGO_PKG_VERSION")).cyan());
    lines.blank();
    lines.push("=== SHOPIFY WEBHOOK TEST ===".cyan().bold());
    lines.finish()
}

/// What is about to be sent.
pub fn render_preamble(request: &WebhookRequest) -> String {
    let mut lines = Lines::default();
    lines.blank();
    lines.push("📤 Sending test webhook...".blue());
    lines.blank();
    lines.push(format!("Endpoint: {}", request.url).cyan());
    lines.push(format!("HMAC: {}", signing::preview(request.signature().unwrap_or_default())).cyan());
    lines.push(format!("Data size: {} bytes", request.body.len()).cyan());
    lines.finish()
}

/// Report for whichever outcome the delivery had.
pub fn render_outcome(outcome: &DeliveryOutcome, body_preview_chars: usize) -> String {
    let mut lines = Lines::default();
    lines.blank();

    match outcome {
        DeliveryOutcome::Received {
            status,
            reason,
            body,
            elapsed,
        } if (200..300).contains(status) => {
            lines.push("✅ RESPONSE RECEIVED".green().bold());
            lines.blank();
            lines.push(format!("Status: {} {}", status, reason.as_deref().unwrap_or_default()).green());
            lines.push(format!("Response time: {}ms", elapsed.as_millis()).green());
            lines.push(format!("Response body: {}", body_preview(body, body_preview_chars)).green());
            lines.blank();
            if *status == 200 {
                lines.push("🎉 Webhook is working correctly!".green());
            } else {
                lines.push(format!("⚠️  Webhook responded with status {status}").yellow());
            }
        }
        DeliveryOutcome::Received { status, reason, body, .. } => {
            lines.push("❌ ERROR SENDING WEBHOOK".red().bold());
            lines.blank();
            lines.push(format!("Status: {status}").red());
            lines.push(format!("Status text: {}", reason.as_deref().unwrap_or("unknown")).red());
            lines.push(format!("Response: {}", body_preview(body, body_preview_chars)).red());
            lines.blank();
            lines.push(format!("Full error: Request failed with status code {status}").red());
        }
        DeliveryOutcome::NoResponse { kind, error } => {
            lines.push("❌ ERROR SENDING WEBHOOK".red().bold());
            lines.blank();
            lines.push("No response received from the server".red());
            match kind {
                NoResponseKind::Timeout => lines.push("The request timed out before the endpoint answered".red()),
                NoResponseKind::Connect => lines.push("Could not connect to the endpoint".red()),
                NoResponseKind::Other => lines.push("The connection failed before a response was read".red()),
            }
            lines.push("Check:".yellow());
            lines.push("  - That the URL is correct".yellow());
            lines.push("  - That the function is deployed".yellow());
            lines.push("  - That there are no network problems".yellow());
            lines.blank();
            lines.push(format!("Full error: {error}").red());
        }
        DeliveryOutcome::InvalidRequest { error } => {
            lines.push("❌ ERROR SENDING WEBHOOK".red().bold());
            lines.blank();
            lines.push(format!("Error: {error}").red());
        }
    }

    lines.finish()
}

/// Message for an error that ended the run early.
pub fn render_fatal(error: &dyn fmt::Display) -> String {
    format!("\n{}\n", format!("❌ Fatal error: {error}").red())
}

/// Response body as shown in the report: compact JSON when it parses, raw text otherwise,
/// cut to `max_chars` characters with a trailing `...` when longer.
pub fn body_preview(body: &str, max_chars: usize) -> String {
    let text = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => body.to_string(),
    };

    let shown = truncate(&text, max_chars);
    if shown.len() < text.len() {
        format!("{shown}...")
    } else {
        text
    }
}

/// At most `max_chars` characters of `text`, never splitting a character.
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
