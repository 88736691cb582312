//! Interactive collection of the run inputs.
//!
//! Answers are taken verbatim: no trimming, no URL or domain checks, empty answers allowed.
//! Whatever the user types is what gets signed and sent.

use std::collections::VecDeque;
use std::fmt;

use dialoguer::{Input, Password};

use crate::config::Config;
use crate::errors::{Error, Result};

/// One of the three questions asked before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Endpoint,
    Secret,
    ShopDomain,
}

impl Question {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Endpoint => "🔗 Endpoint URL (e.g. https://xxx.cloudfunctions.net/shopifyWebhook)",
            Self::Secret => "🔐 Webhook secret (SHOPIFY_WEBHOOK_SECRET)",
            Self::ShopDomain => "🏪 Shop domain (e.g. your-store.myshopify.com)",
        }
    }

    /// Short name used in error messages
    pub fn field(self) -> &'static str {
        match self {
            Self::Endpoint => "endpoint URL",
            Self::Secret => "webhook secret",
            Self::ShopDomain => "shop domain",
        }
    }

    pub fn is_sensitive(self) -> bool {
        matches!(self, Self::Secret)
    }
}

/// Source of answers to [`Question`]s.
pub trait Prompter {
    fn ask(&mut self, question: Question) -> std::result::Result<String, dialoguer::Error>;
}

/// Asks on the controlling terminal. The secret is read without echo.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: Question) -> std::result::Result<String, dialoguer::Error> {
        if question.is_sensitive() {
            Password::new()
                .with_prompt(question.prompt())
                .allow_empty_password(true)
                .interact()
        } else {
            Input::<String>::new()
                .with_prompt(question.prompt())
                .allow_empty(true)
                .interact_text()
        }
    }
}

/// Replays fixed answers in order and records which questions were asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<Question>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[Question] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: Question) -> std::result::Result<String, dialoguer::Error> {
        self.asked.push(question);
        self.answers.pop_front().ok_or_else(|| {
            dialoguer::Error::IO(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no scripted answer left",
            ))
        })
    }
}

/// Endpoint, secret and shop domain for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct RunInputs {
    pub endpoint: String,
    pub secret: String,
    pub shop_domain: String,
}

impl fmt::Debug for RunInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunInputs")
            .field("endpoint", &self.endpoint)
            .field("secret", &"<redacted>")
            .field("shop_domain", &self.shop_domain)
            .finish()
    }
}

/// Fill in the run inputs, asking only for what `config` leaves unset.
///
/// Questions are asked in a fixed order: endpoint, secret, shop domain.
pub fn collect_inputs(config: &Config, prompter: &mut dyn Prompter) -> Result<RunInputs> {
    let endpoint = resolve(config.endpoint.as_deref(), Question::Endpoint, prompter)?;
    let secret = resolve(config.secret.as_deref(), Question::Secret, prompter)?;
    let shop_domain = resolve(config.shop_domain.as_deref(), Question::ShopDomain, prompter)?;

    Ok(RunInputs {
        endpoint,
        secret,
        shop_domain,
    })
}

fn resolve(preset: Option<&str>, question: Question, prompter: &mut dyn Prompter) -> Result<String> {
    if let Some(value) = preset {
        tracing::debug!(field = question.field(), "Using configured value");
        return Ok(value.to_string());
    }

    prompter.ask(question).map_err(|source| Error::Prompt {
        field: question.field(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asks_all_three_in_order() {
        let mut prompter = ScriptedPrompter::new(["http://localhost:8080/hook", "s3cret", "demo.myshopify.com"]);

        let inputs = collect_inputs(&Config::default(), &mut prompter).unwrap();

        assert_eq!(prompter.asked(), [Question::Endpoint, Question::Secret, Question::ShopDomain]);
        assert_eq!(inputs.endpoint, "http://localhost:8080/hook");
        assert_eq!(inputs.secret, "s3cret");
        assert_eq!(inputs.shop_domain, "demo.myshopify.com");
    }

    #[test]
    fn test_skips_configured_values() {
        let config = Config {
            endpoint: Some("https://configured.example.com".to_string()),
            shop_domain: Some("configured.myshopify.com".to_string()),
            ..Default::default()
        };
        let mut prompter = ScriptedPrompter::new(["typed-secret"]);

        let inputs = collect_inputs(&config, &mut prompter).unwrap();

        assert_eq!(prompter.asked(), [Question::Secret]);
        assert_eq!(inputs.endpoint, "https://configured.example.com");
        assert_eq!(inputs.secret, "typed-secret");
    }

    #[test]
    fn test_answers_are_not_validated() {
        let mut prompter = ScriptedPrompter::new(["  not a url ", "", ""]);

        let inputs = collect_inputs(&Config::default(), &mut prompter).unwrap();

        assert_eq!(inputs.endpoint, "  not a url ");
        assert_eq!(inputs.secret, "");
        assert_eq!(inputs.shop_domain, "");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut prompter = ScriptedPrompter::new(["http://localhost:8080/hook"]);

        let err = collect_inputs(&Config::default(), &mut prompter).unwrap_err();

        assert!(matches!(err, Error::Prompt { field: "webhook secret", .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let inputs = RunInputs {
            endpoint: "http://localhost".to_string(),
            secret: "do-not-print".to_string(),
            shop_domain: "demo.myshopify.com".to_string(),
        };

        let rendered = format!("{inputs:?}");
        assert!(!rendered.contains("do-not-print"));
        assert!(rendered.contains("<redacted>"));
    }
}
