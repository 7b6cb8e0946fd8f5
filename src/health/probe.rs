//! RTT probe.
//!
//! # Responsibilities
//! - Measure TCP connect latency to a health-check target
//! - Score a failed or timed-out connect as the timeout itself
//!
//! # Design Decisions
//! - No payload is exchanged; the handshake is the signal
//! - The probe connection is closed as soon as it is established

use std::time::Duration;

use tokio::time::Instant;

use crate::resilience::timeouts::connect_with_timeout;

/// Outcome of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// Connected after the given latency.
    Reached(Duration),
    /// Connect failed or timed out.
    Failed,
}

impl Sample {
    /// Value fed to the RTT window: elapsed milliseconds, or the penalty.
    pub fn as_millis(&self, penalty_ms: u64) -> u64 {
        match self {
            Sample::Reached(rtt) => saturating_millis(*rtt),
            Sample::Failed => penalty_ms,
        }
    }
}

fn saturating_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Probe `target` once, giving up after `timeout`.
pub async fn probe(target: &str, timeout: Duration) -> Sample {
    let started = Instant::now();
    match connect_with_timeout(target, timeout).await {
        Ok(stream) => {
            let rtt = started.elapsed();
            drop(stream);
            tracing::trace!(addr = %target, rtt_ms = saturating_millis(rtt), "Probe reached target");
            Sample::Reached(rtt)
        }
        Err(e) => {
            tracing::debug!(addr = %target, error = %e, "Probe failed");
            Sample::Failed
        }
    }
}
