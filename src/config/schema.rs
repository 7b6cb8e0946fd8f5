//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::failover::Path;

/// Root configuration for the failover relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// Listener configuration (bind address, session limit).
    pub listener: ListenerConfig,

    /// The two forwarding targets.
    pub backends: BackendsConfig,

    /// RTT probing settings.
    pub health_check: HealthCheckConfig,

    /// Hysteresis thresholds.
    pub thresholds: ThresholdConfig,

    /// Minor path dwell (anti-flap) settings.
    pub dwell: DwellConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl FailoverConfig {
    /// Backend address to dial while `path` is active.
    pub fn backend_for(&self, path: Path) -> &str {
        match path {
            Path::Major => &self.backends.major,
            Path::Minor => &self.backends.minor,
        }
    }

    /// Health-check target probed while `path` is active.
    ///
    /// The major target falls back to the major backend itself, and the minor
    /// target falls back to the major target.
    pub fn probe_target_for(&self, path: Path) -> &str {
        let major = self
            .health_check
            .major_target
            .as_deref()
            .unwrap_or(&self.backends.major);
        match path {
            Path::Major => major,
            Path::Minor => self.health_check.minor_target.as_deref().unwrap_or(major),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9999").
    pub bind_address: String,

    /// Maximum concurrent sessions (1 serves one session at a time).
    pub max_connections: usize,
}

impl ListenerConfig {
    /// Address handed to the socket; a bare `:port` means every interface.
    pub fn socket_address(&self) -> String {
        if self.bind_address.starts_with(':') {
            format!("0.0.0.0{}", self.bind_address)
        } else {
            self.bind_address.clone()
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9999".to_string(),
            max_connections: 1,
        }
    }
}

/// Backend addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendsConfig {
    /// Preferred backend (host:port).
    pub major: String,

    /// Fallback backend (host:port).
    pub minor: String,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            major: "127.0.0.1:9200".to_string(),
            minor: "127.0.0.1:9200".to_string(),
        }
    }
}

/// RTT probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Probe cadence in milliseconds. Also the timeout of every dial and the
    /// penalty sample recorded for a failed probe.
    pub ping_interval_ms: u64,

    /// Target probed while major is active. Defaults to the major backend.
    pub major_target: Option<String>,

    /// Target probed while minor is active. Defaults to the major target.
    pub minor_target: Option<String>,

    /// Number of latest samples averaged into the smoothed RTT.
    pub window_size: usize,

    /// Delay between the start of a sampling loop and its first evaluation.
    pub settle_ms: u64,
}

impl HealthCheckConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            ping_interval_ms: 1000,
            major_target: None,
            minor_target: None,
            window_size: 5,
            settle_ms: 3000,
        }
    }
}

/// Hysteresis thresholds, in milliseconds of smoothed RTT.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Smoothed RTT at or below which major is considered alive again.
    pub up_ms: u64,

    /// Smoothed RTT above which major is considered dead.
    pub down_ms: u64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            up_ms: 100,
            down_ms: 120,
        }
    }
}

/// Minor path dwell requirement bounds, in seconds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct DwellConfig {
    /// Initial (and post-amnesty) time to stay on minor after a switch.
    pub min_secs: u64,

    /// Cap on the doubled dwell requirement. Major staying up this long also
    /// resets the requirement to `min_secs`.
    pub max_secs: u64,
}

impl DwellConfig {
    pub fn min(&self) -> Duration {
        Duration::from_secs(self.min_secs)
    }

    pub fn max(&self) -> Duration {
        Duration::from_secs(self.max_secs)
    }
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            min_secs: 30,
            max_secs: 600,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Prefix attached to every log line.
    pub log_prefix: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_prefix: "tcpforward".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
