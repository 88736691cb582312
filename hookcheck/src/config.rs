//! Run configuration.
//!
//! Every setting is optional. Values are merged in the following order (later sources
//! override earlier ones):
//!
//! 1. **YAML config file** - default `hookcheck.yaml`, may be absent
//! 2. **Environment variables** - prefixed with `HOOKCHECK_`, e.g. `HOOKCHECK_TIMEOUT=5s`
//! 3. **CLI flags** - `--url`, `--secret`, `--shop-domain`, `--timeout`
//!
//! Endpoint, secret and shop domain that are still unset after merging are asked for
//! interactively (see [`crate::prompt`]).
//!
//! ## Example
//!
//! ```yaml
//! endpoint: https://xxx.cloudfunctions.net/shopifyWebhook
//! shop_domain: my-store.myshopify.com
//! timeout: 10s
//! body_preview_chars: 500
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeMap, time::Duration};

/// Default upper bound on waiting for the endpoint to answer
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of response body characters shown in the report
pub const DEFAULT_BODY_PREVIEW_CHARS: usize = 200;

/// Settings that are sent or signed exactly as supplied, keyed by their environment variable
const VERBATIM_ENV: [(&str, &str); 3] = [
    ("endpoint", "HOOKCHECK_ENDPOINT"),
    ("secret", "HOOKCHECK_SECRET"),
    ("shop_domain", "HOOKCHECK_SHOP_DOMAIN"),
];

/// Send a signed test Shopify webhook to an endpoint and report how it answered.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to an optional configuration file
    #[arg(short = 'f', long, env = "HOOKCHECK_CONFIG", default_value = "hookcheck.yaml")]
    pub config: String,

    /// Endpoint URL that receives the webhook
    #[arg(long)]
    pub url: Option<String>,

    /// Shared webhook secret (SHOPIFY_WEBHOOK_SECRET)
    #[arg(long)]
    pub secret: Option<String>,

    /// Shop domain sent in X-Shopify-Shop-Domain
    #[arg(long)]
    pub shop_domain: Option<String>,

    /// How long to wait for a response, e.g. `30s` or `2m`
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,
}

impl Args {
    /// Args pointing at `config` with no flag overrides.
    pub fn with_config(config: impl Into<String>) -> Self {
        Self {
            config: config.into(),
            url: None,
            secret: None,
            shop_domain: None,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Endpoint URL under test
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "verbatim_string")]
    pub endpoint: Option<String>,
    /// Shared webhook secret
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "verbatim_string")]
    pub secret: Option<String>,
    /// Shop domain identifying the sending store
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "verbatim_string")]
    pub shop_domain: Option<String>,
    /// Upper bound on waiting for a response (default: 30s)
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Response body characters shown before truncation (default: 200)
    pub body_preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            secret: None,
            shop_domain: None,
            timeout: DEFAULT_TIMEOUT,
            body_preview_chars: DEFAULT_BODY_PREVIEW_CHARS,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // CLI flags win over file and environment
        if let Some(url) = &args.url {
            config.endpoint = Some(url.clone());
        }
        if let Some(secret) = &args.secret {
            config.secret = Some(secret.clone());
        }
        if let Some(shop_domain) = &args.shop_domain {
            config.shop_domain = Some(shop_domain.clone());
        }
        if let Some(timeout) = args.timeout {
            config.timeout = timeout;
        }

        config.validate().map_err(figment::Error::from)?;
        Ok(config)
    }

    /// Reject settings that would make a run meaningless.
    ///
    /// Endpoint, secret and shop domain are never validated, whatever their source.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout.is_zero() {
            return Err("Config validation: timeout must be greater than zero".to_string());
        }
        if self.body_preview_chars == 0 {
            return Err("Config validation: body_preview_chars must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // A missing file contributes nothing
            .merge(Yaml::file(&args.config))
            // HOOKCHECK_CONFIG names the file itself, it is not a setting
            .merge(Env::prefixed("HOOKCHECK_").ignore(&["config", "endpoint", "secret", "shop_domain"]))
            // Env would parse these as typed values and trim them
            .merge(Serialized::defaults(verbatim_env()))
    }
}

/// Raw, untrimmed values of the [`VERBATIM_ENV`] variables that are set.
fn verbatim_env() -> BTreeMap<&'static str, String> {
    VERBATIM_ENV
        .into_iter()
        .filter_map(|(key, var)| std::env::var(var).ok().map(|value| (key, value)))
        .collect()
}

/// Accept any scalar as a string, so `secret: 123456` in YAML is the secret `"123456"`.
fn verbatim_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected a string, found {other}"))),
    }
}
