//! RTT sampling loop.
//!
//! # Responsibilities
//! - Probe the health-check target of the active path once per tick
//! - Feed the smoothed RTT to the failover controller
//! - Restart with a fresh window whenever the epoch changes

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::FailoverConfig;
use crate::failover::{Epoch, Evaluation, FailoverController};
use crate::health::probe::probe;
use crate::health::window::RttWindow;
use crate::observability::metrics;

/// Supervisory task driving the failover controller.
pub struct HealthMonitor {
    controller: Arc<FailoverController>,
    config: Arc<FailoverConfig>,
}

impl HealthMonitor {
    pub fn new(controller: Arc<FailoverController>, config: Arc<FailoverConfig>) -> Self {
        Self { controller, config }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut epochs = self.controller.subscribe();

        tracing::info!(
            interval_ms = self.config.health_check.ping_interval_ms,
            window = self.config.health_check.window_size,
            up_ms = self.config.thresholds.up_ms,
            down_ms = self.config.thresholds.down_ms,
            "Health monitor starting"
        );

        loop {
            let epoch = *epochs.borrow_and_update();

            tokio::select! {
                _ = self.sample_epoch(epoch) => {}
                changed = epochs.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Sample until the controller leaves `epoch`.
    async fn sample_epoch(&self, epoch: Epoch) {
        let health = &self.config.health_check;
        let interval = health.ping_interval();
        let penalty_ms = health.ping_interval_ms;
        let target = self.config.probe_target_for(epoch.path);
        let mut window = RttWindow::for_path(epoch.path, health.window_size, penalty_ms);

        tracing::debug!(
            path = %epoch.path,
            addr = %target,
            generation = epoch.generation,
            "Sampling loop started"
        );

        time::sleep(health.settle_delay()).await;

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let smoothed = window.smoothed();
            tracing::info!(addr = %target, rtt_ms = smoothed, "Measured RTT");
            metrics::record_smoothed_rtt(smoothed);

            match self.controller.evaluate(epoch.generation, smoothed) {
                Evaluation::Hold => {}
                Evaluation::Switched(_) | Evaluation::Stale(_) => return,
            }

            ticker.tick().await;
            let sample = probe(target, interval).await;
            window.push(sample.as_millis(penalty_ms));
        }
    }
}
