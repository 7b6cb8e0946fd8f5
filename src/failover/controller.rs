//! Process-wide failover controller.
//!
//! # Responsibilities
//! - Own the failover state behind a mutex
//! - Publish the active epoch to sessions and the health monitor
//! - Ignore reports made against an epoch that is no longer current

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::FailoverConfig;
use crate::failover::state::{FailoverState, Transition};
use crate::failover::Path;
use crate::observability::metrics;

/// A span of time during which one path is active.
///
/// The generation increases by one on every switch; sessions dialed in an
/// epoch are torn down as soon as the generation moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    pub path: Path,
    pub generation: u64,
}

/// Result of feeding one smoothed RTT into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Path unchanged.
    Hold,
    /// Path switched; the new epoch is already published.
    Switched(Epoch),
    /// The observation was made against an older epoch and was discarded.
    Stale(Epoch),
}

struct Inner {
    state: FailoverState,
    generation: u64,
}

impl Inner {
    fn epoch(&self) -> Epoch {
        Epoch {
            path: self.state.path(),
            generation: self.generation,
        }
    }
}

/// Single authority over the active path.
pub struct FailoverController {
    inner: Mutex<Inner>,
    epoch_tx: watch::Sender<Epoch>,
}

impl FailoverController {
    /// Create a controller starting on the major path.
    pub fn new(config: &FailoverConfig) -> Self {
        let state = FailoverState::new(config.thresholds, config.dwell, Instant::now());
        let inner = Inner {
            state,
            generation: 0,
        };
        let (epoch_tx, _) = watch::channel(inner.epoch());

        metrics::record_active_path(Path::Major);
        metrics::record_dwell_requirement(config.dwell.min());

        Self {
            inner: Mutex::new(inner),
            epoch_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State stays consistent across a panic in a logging call.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The epoch currently in effect.
    pub fn current(&self) -> Epoch {
        self.lock().epoch()
    }

    pub fn active_path(&self) -> Path {
        self.current().path
    }

    pub fn dwell_requirement(&self) -> Duration {
        self.lock().state.dwell_requirement()
    }

    /// Watch for epoch changes.
    pub fn subscribe(&self) -> watch::Receiver<Epoch> {
        self.epoch_tx.subscribe()
    }

    /// Feed a smoothed RTT measured during epoch `generation`.
    pub fn evaluate(&self, generation: u64, smoothed_ms: u64) -> Evaluation {
        let mut inner = self.lock();
        if inner.generation != generation {
            return Evaluation::Stale(inner.epoch());
        }

        let dwell_before = inner.state.dwell_requirement();
        let evaluation = match inner.state.evaluate(smoothed_ms, Instant::now()) {
            Some(transition) => {
                log_transition(&transition, smoothed_ms);
                Evaluation::Switched(self.advance(&mut inner))
            }
            None => Evaluation::Hold,
        };

        let dwell_after = inner.state.dwell_requirement();
        if dwell_after != dwell_before {
            metrics::record_dwell_requirement(dwell_after);
        }
        evaluation
    }

    /// Flip the path after the backend of epoch `generation` refused a dial.
    ///
    /// Returns the new epoch, or `None` if the epoch had already moved on.
    pub fn report_dial_failure(&self, generation: u64) -> Option<Epoch> {
        let mut inner = self.lock();
        if inner.generation != generation {
            return None;
        }

        let transition = inner.state.flip(Instant::now());
        tracing::warn!(
            from = %transition.from,
            to = %transition.to,
            "Backend dial failed, switching path"
        );
        Some(self.advance(&mut inner))
    }

    fn advance(&self, inner: &mut Inner) -> Epoch {
        inner.generation += 1;
        let epoch = inner.epoch();
        // Published under the lock so subscribers never observe epochs out of order.
        self.epoch_tx.send_replace(epoch);
        metrics::record_switch(epoch.path);
        epoch
    }
}

fn log_transition(transition: &Transition, smoothed_ms: u64) {
    match transition.to {
        Path::Minor => tracing::warn!(
            rtt_ms = smoothed_ms,
            dwell_secs = transition.dwell.as_secs(),
            "Major path unhealthy, switching to minor"
        ),
        Path::Major => tracing::info!(
            rtt_ms = smoothed_ms,
            next_dwell_secs = transition.dwell.as_secs(),
            "Major path recovered, switching to major"
        ),
    }
}
