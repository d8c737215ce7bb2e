use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use iperf3_exporter::cli::Cli;
use iperf3_exporter::metrics::MetricsState;
use iperf3_exporter::probe::ProbeRunner;
use iperf3_exporter::scheduler::Scheduler;
use iperf3_exporter::server;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.into_config()?;

    let metrics =
        Arc::new(MetricsState::new().context("failed to set up the metrics registry")?);

    let runner = ProbeRunner::new(config.target.clone(), config.probe_duration_secs)
        .with_binary(config.iperf3_path.clone());
    let scheduler = Scheduler::new(runner, Arc::clone(&metrics), config.interval);

    info!(
        "probing {} every {}s ({}s per run)",
        config.target,
        config.interval.as_secs(),
        config.probe_duration_secs
    );
    tokio::spawn(scheduler.run());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.listen_port))
        .await
        .with_context(|| format!("failed to bind port {}", config.listen_port))?;
    info!("listen port {}", config.listen_port);

    server::serve(listener, metrics)
        .await
        .context("metrics server failed")?;

    Ok(())
}
