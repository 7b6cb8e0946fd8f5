//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound every outbound TCP connect (backend dial and RTT probe)
//! - Keep timeout errors distinct from connect errors

use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time;

/// Error type for bounded dials.
#[derive(Debug, Error)]
pub enum DialError {
    /// The connect did not complete within the deadline.
    #[error("connect to {addr} timed out after {}ms", .timeout.as_millis())]
    Timeout { addr: String, timeout: Duration },

    /// The connect failed outright (refused, unreachable, resolution).
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Open a TCP connection to `addr`, giving up after `timeout`.
pub async fn connect_with_timeout(addr: &str, timeout: Duration) -> Result<TcpStream, DialError> {
    match time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(source)) => Err(DialError::Connect {
            addr: addr.to_string(),
            source,
        }),
        Err(_) => Err(DialError::Timeout {
            addr: addr.to_string(),
            timeout,
        }),
    }
}
