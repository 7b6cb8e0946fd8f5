//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Per tick (monitor.rs):
//!     probe.rs (TCP connect to the active path's health-check target)
//!     → window.rs (append sample, evict oldest, truncating mean)
//!     → failover controller (hysteresis + dwell decision)
//!
//! On epoch change:
//!     → discard window, settle, start sampling the new path's target
//! ```
//!
//! # Design Decisions
//! - Probe timeout equals the ping interval; a failed probe scores as that value
//! - Ticks never overlap: the next probe waits for the previous one
//! - A window starting on minor is pre-filled with penalties

pub mod monitor;
pub mod probe;
pub mod window;

pub use monitor::HealthMonitor;
pub use window::RttWindow;
