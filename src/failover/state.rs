//! Failover state machine.
//!
//! # States
//! - Major: preferred backend active, probing its health-check target
//! - Minor: fallback backend active, waiting for major to recover
//!
//! # State Transitions
//! ```text
//! Major → Minor: smoothed RTT > down threshold
//! Minor → Major: smoothed RTT <= up threshold AND time on minor > dwell requirement
//! Either → other: backend dial failure (no dwell change)
//! ```
//!
//! # Dwell clock
//! The requirement starts at the configured minimum and doubles (capped at
//! the maximum) every time minor hands back to major, so the next minor stay
//! lasts longer. Once major has been active for the maximum dwell, the
//! requirement falls back to the minimum.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::{DwellConfig, ThresholdConfig};
use crate::failover::Path;
use crate::resilience::backoff::next_dwell;

/// A path switch decided by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Path,
    pub to: Path,
    /// Minor dwell requirement in effect after the switch.
    pub dwell: Duration,
}

/// Active path plus dwell clock. Pure: callers supply the current instant.
#[derive(Debug, Clone)]
pub struct FailoverState {
    path: Path,
    switched_at: Instant,
    dwell: Duration,
    thresholds: ThresholdConfig,
    bounds: DwellConfig,
}

impl FailoverState {
    /// Start on the major path with the minimum dwell requirement.
    pub fn new(thresholds: ThresholdConfig, bounds: DwellConfig, now: Instant) -> Self {
        Self {
            path: Path::Major,
            switched_at: now,
            dwell: bounds.min(),
            thresholds,
            bounds,
        }
    }

    pub fn path(&self) -> Path {
        self.path
    }

    /// Current minor dwell requirement.
    pub fn dwell_requirement(&self) -> Duration {
        self.dwell
    }

    /// Time spent on the current path.
    pub fn since_switch(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.switched_at)
    }

    /// Apply one smoothed RTT observation.
    ///
    /// Returns the transition if the path switched.
    pub fn evaluate(&mut self, smoothed_ms: u64, now: Instant) -> Option<Transition> {
        let elapsed = self.since_switch(now);

        match self.path {
            Path::Major if smoothed_ms > self.thresholds.down_ms => Some(self.switch(now)),
            Path::Minor if smoothed_ms <= self.thresholds.up_ms && elapsed > self.dwell => {
                self.dwell = next_dwell(self.dwell, self.bounds.max());
                Some(self.switch(now))
            }
            Path::Major => {
                if elapsed >= self.bounds.max() && self.dwell != self.bounds.min() {
                    self.dwell = self.bounds.min();
                    tracing::info!(
                        dwell_secs = self.dwell.as_secs(),
                        "Major stable, minor dwell requirement reset"
                    );
                }
                None
            }
            Path::Minor => None,
        }
    }

    /// Switch paths unconditionally, leaving the dwell requirement alone.
    pub fn flip(&mut self, now: Instant) -> Transition {
        self.switch(now)
    }

    fn switch(&mut self, now: Instant) -> Transition {
        let from = self.path;
        self.path = from.flipped();
        self.switched_at = now;
        Transition {
            from,
            to: self.path,
            dwell: self.dwell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn state(now: Instant) -> FailoverState {
        FailoverState::new(ThresholdConfig::default(), DwellConfig::default(), now)
    }

    /// Drive a fresh state onto the minor path at `now`.
    fn on_minor(now: Instant) -> FailoverState {
        let mut s = state(now);
        s.evaluate(500, now).expect("switch to minor");
        s
    }

    #[test]
    fn starts_on_major_with_minimum_dwell() {
        let s = state(Instant::now());
        assert_eq!(s.path(), Path::Major);
        assert_eq!(s.dwell_requirement(), secs(30));
    }

    #[test]
    fn down_threshold_is_strict() {
        let t0 = Instant::now();
        let mut s = state(t0);

        assert_eq!(s.evaluate(120, t0 + secs(1)), None);
        assert_eq!(s.path(), Path::Major);

        let transition = s.evaluate(121, t0 + secs(2)).unwrap();
        assert_eq!(transition.from, Path::Major);
        assert_eq!(transition.to, Path::Minor);
        assert_eq!(transition.dwell, secs(30));
        assert_eq!(s.path(), Path::Minor);
    }

    #[test]
    fn minor_holds_until_dwell_elapsed() {
        let t0 = Instant::now();
        let mut s = on_minor(t0);

        assert_eq!(s.evaluate(100, t0 + secs(29)), None);
        // Elapsed must exceed the requirement, not merely reach it.
        assert_eq!(s.evaluate(100, t0 + secs(30)), None);
        assert_eq!(s.path(), Path::Minor);

        let transition = s.evaluate(100, t0 + secs(31)).unwrap();
        assert_eq!(transition.to, Path::Major);
    }

    #[test]
    fn minor_holds_while_rtt_above_up_threshold() {
        let t0 = Instant::now();
        let mut s = on_minor(t0);

        // Inside the dead band: neither healthy nor long enough to matter.
        assert_eq!(s.evaluate(101, t0 + secs(3600)), None);
        assert_eq!(s.path(), Path::Minor);
    }

    #[test]
    fn dwell_doubles_per_minor_stay_and_saturates() {
        let mut now = Instant::now();
        let mut s = state(now);
        let mut requirements = Vec::new();

        for _ in 0..8 {
            let down = s.evaluate(500, now).unwrap();
            assert_eq!(down.to, Path::Minor);
            requirements.push(s.dwell_requirement().as_secs());

            now += s.dwell_requirement() + secs(1);
            let up = s.evaluate(50, now).unwrap();
            assert_eq!(up.to, Path::Major);
        }

        assert_eq!(requirements, vec![30, 60, 120, 240, 480, 600, 600, 600]);
    }

    #[test]
    fn sustained_major_resets_dwell() {
        let t0 = Instant::now();
        let mut s = on_minor(t0);
        let back = t0 + secs(31);
        s.evaluate(50, back).unwrap();
        assert_eq!(s.dwell_requirement(), secs(60));

        // Not long enough for amnesty.
        assert_eq!(s.evaluate(50, back + secs(599)), None);
        assert_eq!(s.dwell_requirement(), secs(60));

        assert_eq!(s.evaluate(50, back + secs(600)), None);
        assert_eq!(s.dwell_requirement(), secs(30));

        let down = s.evaluate(500, back + secs(601)).unwrap();
        assert_eq!(down.dwell, secs(30));
    }

    #[test]
    fn flip_preserves_dwell() {
        let t0 = Instant::now();
        let mut s = state(t0);

        let transition = s.flip(t0);
        assert_eq!(transition.to, Path::Minor);
        assert_eq!(s.dwell_requirement(), secs(30));

        let transition = s.flip(t0 + secs(1));
        assert_eq!(transition.to, Path::Major);
        assert_eq!(s.dwell_requirement(), secs(30));
    }

    #[test]
    fn switch_restarts_clock() {
        let t0 = Instant::now();
        let mut s = state(t0);
        s.evaluate(500, t0 + secs(100)).unwrap();
        assert_eq!(s.since_switch(t0 + secs(110)), secs(10));
    }
}
