//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, session limit)
//!     → connection.rs (session ID, active-session tracking)
//!     → Hand off to proxy::session
//! ```
//!
//! # Design Decisions
//! - Bounded accept prevents resource exhaustion
//! - A limit of one reproduces single-session serving
//! - Accept errors are fatal; nothing restarts the listener

pub mod connection;
pub mod listener;
