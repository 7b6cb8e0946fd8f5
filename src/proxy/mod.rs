//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! net::listener (accept, session permit)
//!     → server.rs (session ID, span, spawn)
//!     → session.rs (dial active backend, splice, watch epoch)
//!
//! health::monitor runs beside the accept loop for the process lifetime.
//! ```

pub mod server;
pub mod session;

pub use server::FailoverProxy;
pub use session::{SessionForwarder, SessionOutcome};
