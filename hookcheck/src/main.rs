use std::process::ExitCode;

use clap::Parser;
use hookcheck::{Config, TerminalPrompter, config::Args, report, telemetry};

async fn try_main(args: Args) -> anyhow::Result<()> {
    let config = Config::load(&args).map_err(hookcheck::Error::from)?;

    telemetry::init_telemetry()?;
    tracing::debug!(config = %args.config, timeout = ?config.timeout, "Configuration loaded");

    let outcome = hookcheck::run(&config, &mut TerminalPrompter, &mut std::io::stdout()).await?;
    tracing::debug!(success = outcome.is_success(), "Run completed");

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    match try_main(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", report::render_fatal(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}
