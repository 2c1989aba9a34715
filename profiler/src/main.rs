use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use profile_loadgen::config::{Cli, Config};
use profile_loadgen::{Diagnostics, HttpRequestExecutor, LoadRunner, Payload};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Initialize tracing (stderr only, stdout carries the result)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // The payload is required by every request, so failing here ends the
    // process with status 1 before anything is sent.
    let payload = Payload::load(&config.payload_path).with_context(|| {
        format!("Failed to load payload from {:?}", config.payload_path)
    })?;
    info!(
        "Loaded payload: {} bytes from {:?}",
        payload.len(),
        config.payload_path
    );

    let cli = Cli::parse();
    info!(
        "Target: {} ({} requests)",
        cli.target_url, cli.request_count
    );

    let executor = HttpRequestExecutor::new(cli.target_url, payload)
        .context("Failed to build HTTP client")?;
    let runner = LoadRunner::new(Arc::new(executor), Diagnostics::stderr());

    let report = runner.run(cli.request_count).await?;
    println!("{}", report);

    Ok(())
}
