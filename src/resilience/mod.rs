//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dial to backend or probe target:
//!     → timeouts.rs (connect bounded by the ping interval)
//!
//! Return from the minor path:
//!     → backoff.rs (double the next minor dwell, capped)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every dial has a deadline
//! - Backoff is deterministic: no jitter, the dwell is a policy bound

pub mod backoff;
pub mod timeouts;
