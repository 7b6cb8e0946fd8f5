//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, prefixed root span)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (human-readable or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every failover decision and session end is a log event
//! - Metrics go through the `metrics` facade; without an exporter they are no-ops

pub mod logging;
pub mod metrics;
