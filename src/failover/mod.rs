//! Failover decision engine.
//!
//! # Data Flow
//! ```text
//! Smoothed RTT (health::monitor)
//!     → controller.rs (stale-epoch guard, mutex)
//!     → state.rs (hysteresis + dwell clock)
//!     → new Epoch published on a watch channel
//!     → sessions on the old epoch tear down, monitor restarts its loop
//!
//! States:
//!     Major ──(rtt > down)──────────────────▶ Minor
//!     Minor ──(rtt <= up && dwell elapsed)──▶ Major
//!     either ──(backend dial failure)───────▶ other
//! ```
//!
//! # Design Decisions
//! - Path and dwell clock are process-wide and outlive any session
//! - Every decision is keyed by epoch generation so concurrent reporters
//!   cannot flip the path twice for the same observation
//! - Dwell requirement doubles per minor stay, capped, with an amnesty
//!   after major stays up for the maximum dwell

pub mod controller;
pub mod state;

pub use controller::{Epoch, Evaluation, FailoverController};
pub use state::{FailoverState, Transition};

use serde::{Deserialize, Serialize};

/// One of the two forwarding targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Path {
    /// Preferred backend, used while healthy.
    Major,
    /// Fallback backend.
    Minor,
}

impl Path {
    /// The other path.
    pub fn flipped(self) -> Self {
        match self {
            Path::Major => Path::Minor,
            Path::Minor => Path::Major,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Path::Major => "major",
            Path::Minor => "minor",
        }
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_involution() {
        assert_eq!(Path::Major.flipped(), Path::Minor);
        assert_eq!(Path::Minor.flipped(), Path::Major);
        assert_eq!(Path::Major.flipped().flipped(), Path::Major);
    }
}
