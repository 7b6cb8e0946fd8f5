//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Stop health monitor → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Listener or accept failure is fatal; there is no supervisor restart
//! - In-flight sessions are not drained; the process exits after the loop stops

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
