//! RTT-driven TCP failover relay library.

pub mod cli;
pub mod config;
pub mod failover;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod resilience;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::schema::FailoverConfig;
pub use failover::{FailoverController, Path};
pub use lifecycle::Shutdown;
pub use proxy::FailoverProxy;
