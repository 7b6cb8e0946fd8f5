//! Command-line interface.
//!
//! Flags override values read from the optional `--config` file, which in
//! turn override the built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::validation::validate_config;
use crate::config::FailoverConfig;

#[derive(Debug, Parser)]
#[command(name = "rtt-failover")]
#[command(about = "TCP relay that fails over between two backends based on measured RTT", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// host:port to listen on
    #[arg(long)]
    pub local: Option<String>,

    /// host:port preferred to forward to
    #[arg(long)]
    pub major_remote: Option<String>,

    /// host:port to forward to as backup
    #[arg(long)]
    pub minor_remote: Option<String>,

    /// String to prefix log output
    #[arg(short = 'p', long = "prefix")]
    pub prefix: Option<String>,

    /// Interval in ms between RTT probes; also the dial timeout
    #[arg(long)]
    pub ping_interval: Option<u64>,

    /// TCP endpoint probed while major is up (default: major remote)
    #[arg(long)]
    pub rtt_dest_major: Option<String>,

    /// TCP endpoint probed while major is down (default: major probe endpoint)
    #[arg(long)]
    pub rtt_dest_minor: Option<String>,

    /// Number of latest samples averaged into the smoothed RTT
    #[arg(long)]
    pub rtt_window: Option<usize>,

    /// Smoothed RTT (ms) at or below which major is considered alive
    #[arg(long)]
    pub up_thresh: Option<u64>,

    /// Smoothed RTT (ms) above which major is considered dead
    #[arg(long)]
    pub down_thresh: Option<u64>,

    /// Minimum seconds to stay on minor after a switch
    #[arg(long)]
    pub min_minor_time: Option<u64>,

    /// Maximum seconds to stay on minor after a switch
    #[arg(long)]
    pub max_minor_time: Option<u64>,

    /// Maximum concurrent sessions
    #[arg(long)]
    pub max_sessions: Option<usize>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_address: Option<String>,
}

impl Cli {
    /// Layer the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut FailoverConfig) {
        if let Some(local) = &self.local {
            config.listener.bind_address = local.clone();
        }
        if let Some(max) = self.max_sessions {
            config.listener.max_connections = max;
        }
        if let Some(major) = &self.major_remote {
            config.backends.major = major.clone();
        }
        if let Some(minor) = &self.minor_remote {
            config.backends.minor = minor.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.observability.log_prefix = prefix.clone();
        }
        if let Some(interval) = self.ping_interval {
            config.health_check.ping_interval_ms = interval;
        }
        // An empty endpoint means "use the default".
        if let Some(dest) = &self.rtt_dest_major {
            config.health_check.major_target = non_empty(dest);
        }
        if let Some(dest) = &self.rtt_dest_minor {
            config.health_check.minor_target = non_empty(dest);
        }
        if let Some(window) = self.rtt_window {
            config.health_check.window_size = window;
        }
        if let Some(up) = self.up_thresh {
            config.thresholds.up_ms = up;
        }
        if let Some(down) = self.down_thresh {
            config.thresholds.down_ms = down;
        }
        if let Some(min) = self.min_minor_time {
            config.dwell.min_secs = min;
        }
        if let Some(max) = self.max_minor_time {
            config.dwell.max_secs = max;
        }
        if self.json_logs {
            config.observability.json_logs = true;
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = addr.clone();
        }
    }

    /// Build the validated configuration for this invocation.
    pub fn into_config(self) -> Result<FailoverConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => FailoverConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
