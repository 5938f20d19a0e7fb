//! rsyslog exporter binary
//!
//! Reads impstats records from stdin and serves them on the telemetry
//! endpoint until SIGINT or SIGTERM.

use clap::Parser;
use rsyslog_exporter::{
    config::Cli,
    ingest::IngestLoop,
    metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig},
    model::PointStore,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!("rsyslog exporter v{}", rsyslog_exporter::VERSION);

    let store = Arc::new(PointStore::new());
    let registry = match MetricsRegistry::new(Arc::clone(&store)) {
        Ok(registry) => registry,
        Err(e) => {
            error!(error = %e, "Failed to create metrics registry");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Signal received, shutting down");
        signal_token.cancel();
    }) {
        error!(error = %e, "Failed to install signal handler");
        return ExitCode::FAILURE;
    }

    // Plain thread rather than a blocking task: a read parked on stdin
    // must not keep the runtime from shutting down.
    let ingest_token = shutdown.clone();
    let silent = config.silent;
    let spawned = thread::Builder::new()
        .name("ingest".to_string())
        .spawn(move || {
            let mut ingest = IngestLoop::new(std::io::stdin().lock(), store).with_silent(silent);
            match ingest.run(&ingest_token) {
                Ok(()) => info!("Exporter run ended normally"),
                Err(e) => error!(error = %e, "Exporter run ended with error"),
            }
        });
    if let Err(e) = spawned {
        error!(error = %e, "Failed to start ingest thread");
        return ExitCode::FAILURE;
    }

    let server_config = MetricsServerConfig {
        bind_addr: config.listen_address,
        telemetry_path: config.telemetry_path,
        ..Default::default()
    };
    match MetricsServer::new(server_config, registry)
        .run(shutdown.clone())
        .await
    {
        Ok(()) => {
            info!("Server shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Metrics server failed");
            shutdown.cancel();
            ExitCode::FAILURE
        }
    }
}
