//! webmon - continuous uptime and latency monitor for a fixed set of URLs.
//!
//! Polls every target on a shared tick, renders a live table to the
//! terminal, and serves paginated per-target history over HTTP.

mod config;
mod monitor;
mod probe;
mod render;
mod stats;
mod web;

use config::{MonitorConfig, ServerConfig};
use monitor::Monitor;
use web::Server;

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("webmon=info".parse()?),
        )
        .init();

    // Targets come from the command line, validated before anything starts.
    let targets: Vec<String> = std::env::args().skip(1).collect();
    config::validate_targets(&targets)?;

    let cfg = ServerConfig::load();
    tracing::info!(
        targets = targets.len(),
        port = cfg.http_port,
        "starting webmon"
    );

    let client = reqwest::Client::builder()
        .timeout(cfg.request_timeout)
        .build()?;

    let monitor = Arc::new(Monitor::new(MonitorConfig {
        targets,
        client,
        tick_period: cfg.tick_period,
        renderer: Arc::new(render::render_table),
    }));

    // One stop signal fans out to the monitor and the web server.
    let (stop_tx, _) = broadcast::channel(1);

    {
        let stop_tx = stop_tx.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            let _ = stop_tx.send(());
        });
    }

    let monitor_task = {
        let monitor = Arc::clone(&monitor);
        let stop_rx = stop_tx.subscribe();
        tokio::spawn(async move { monitor.run(stop_rx).await })
    };

    let server = Server::new(cfg, monitor);
    server.start(stop_tx.subscribe()).await?;

    // The monitor waits for in-flight fetches and renders once more.
    let _ = monitor_task.await;

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
