//! Metrics collection and exposition.
//!
//! # Metrics
//! - `failover_smoothed_rtt_ms` (gauge): latest smoothed RTT
//! - `failover_active_path` (gauge): 0=major, 1=minor
//! - `failover_dwell_requirement_secs` (gauge): current minor dwell requirement
//! - `failover_switches_total` (counter): path switches by destination
//! - `failover_dial_failures_total` (counter): backend dial failures by path
//! - `failover_active_sessions` (gauge): sessions currently relayed
//! - `failover_sessions_total` (counter): finished sessions by outcome
//! - `failover_bytes_total` (counter): relayed bytes by direction

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::failover::Path;
use crate::proxy::SessionOutcome;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_smoothed_rtt(rtt_ms: u64) {
    gauge!("failover_smoothed_rtt_ms").set(rtt_ms as f64);
}

pub fn record_active_path(path: Path) {
    let value = match path {
        Path::Major => 0.0,
        Path::Minor => 1.0,
    };
    gauge!("failover_active_path").set(value);
}

pub fn record_switch(to: Path) {
    counter!("failover_switches_total", "to" => to.as_str()).increment(1);
    record_active_path(to);
}

pub fn record_dwell_requirement(dwell: Duration) {
    gauge!("failover_dwell_requirement_secs").set(dwell.as_secs_f64());
}

pub fn record_dial_failure(path: Path) {
    counter!("failover_dial_failures_total", "path" => path.as_str()).increment(1);
}

pub fn record_active_sessions(active: u64) {
    gauge!("failover_active_sessions").set(active as f64);
}

pub fn record_session(outcome: SessionOutcome) {
    counter!("failover_sessions_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_bytes(to_backend: u64, to_client: u64) {
    counter!("failover_bytes_total", "direction" => "to_backend").increment(to_backend);
    counter!("failover_bytes_total", "direction" => "to_client").increment(to_client);
}
