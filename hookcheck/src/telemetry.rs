//! Tracing initialization.
//!
//! Diagnostics go to stderr so they never interleave with the report on stdout. The filter
//! is read from `RUST_LOG` and defaults to `warn`; use `RUST_LOG=hookcheck=debug` to see the
//! request as it is built and sent.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the console tracing subscriber
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    tracing::debug!("Telemetry initialized");
    Ok(())
}
