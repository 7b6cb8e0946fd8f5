//! RTT failover relay (v1)
//!
//! Forwards TCP sessions to a preferred ("major") backend and fails over to a
//! fallback ("minor") backend when the smoothed connect latency to a
//! health-check target degrades.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                 FAILOVER RELAY                │
//!                       │                                               │
//!     Client            │  ┌──────────┐    ┌───────────────┐            │      ┌─────────┐
//!     ──────────────────┼─▶│   net    │───▶│ proxy session │──(major)───┼─────▶│ Major   │
//!                       │  │ listener │    │ dial + splice │            │      └─────────┘
//!                       │  └──────────┘    └───────┬───────┘──(minor)───┼─────▶┌─────────┐
//!                       │                          │ epoch watch        │      │ Minor   │
//!                       │                  ┌───────┴───────┐            │      └─────────┘
//!                       │                  │   failover    │            │
//!                       │                  │  controller   │            │
//!                       │                  └───────▲───────┘            │
//!                       │                          │ smoothed RTT       │      ┌─────────┐
//!                       │                  ┌───────┴───────┐   probe    │      │ Health  │
//!                       │                  │ health monitor│────────────┼─────▶│ target  │
//!                       │                  └───────────────┘            │      └─────────┘
//!                       └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tracing::Instrument;

use rtt_failover::cli::Cli;
use rtt_failover::lifecycle::signals::shutdown_on_signal;
use rtt_failover::net::listener::Listener;
use rtt_failover::observability::{logging, metrics};
use rtt_failover::{FailoverConfig, FailoverProxy, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);
    let root = logging::root_span(&config.observability);

    run(config).instrument(root).await
}

async fn run(config: FailoverConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("rtt-failover v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        major = %config.backends.major,
        minor = %config.backends.minor,
        ping_interval_ms = config.health_check.ping_interval_ms,
        window = config.health_check.window_size,
        up_ms = config.thresholds.up_ms,
        down_ms = config.thresholds.down_ms,
        min_dwell_secs = config.dwell.min_secs,
        max_dwell_secs = config.dwell.max_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = Listener::bind(&config.listener).await.inspect_err(|e| {
        tracing::error!(error = %e, "Fatal listener error");
    })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move { shutdown_on_signal(&signal_shutdown).await }.in_current_span());

    let proxy = FailoverProxy::new(config);
    if let Err(e) = proxy.run(listener, server_shutdown).await {
        tracing::error!(error = %e, "Fatal listener error");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
