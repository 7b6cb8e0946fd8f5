//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Carry the configured log prefix on every line
//!
//! # Design Decisions
//! - Level configurable via `RUST_LOG`, defaulting to info for this crate
//! - JSON format optional for log shippers

use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ObservabilityConfig;

const DEFAULT_FILTER: &str = "rtt_failover=info";

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(false).boxed()
    };

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Root span whose `prefix` field is attached to every event under it.
pub fn root_span(config: &ObservabilityConfig) -> Span {
    tracing::info_span!("relay", prefix = %config.log_prefix)
}
