//! Session forwarding.
//!
//! # Responsibilities
//! - Dial the backend of the active path
//! - Splice bytes in both directions until either side closes
//! - Tear the session down when the failover epoch moves on
//!
//! # Design Decisions
//! - One direction ending ends the session; both sockets close together
//! - Mid-stream I/O errors are treated as end-of-stream
//! - A dial failure flips the path and the client only sees a close

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;

use crate::config::FailoverConfig;
use crate::failover::{Epoch, FailoverController};
use crate::observability::metrics;
use crate::resilience::timeouts::connect_with_timeout;

const SPLICE_BUFFER_SIZE: usize = 8192;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The backend could not be dialed; nothing was forwarded.
    DialFailed,
    /// The client closed (or errored) first.
    ClientClosed,
    /// The backend closed (or errored) first.
    BackendClosed,
    /// The path switched while the session was open.
    FailedOver,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::DialFailed => "dial_failed",
            SessionOutcome::ClientClosed => "client_closed",
            SessionOutcome::BackendClosed => "backend_closed",
            SessionOutcome::FailedOver => "failed_over",
        }
    }
}

/// Relays accepted client connections to the active backend.
#[derive(Clone)]
pub struct SessionForwarder {
    config: Arc<FailoverConfig>,
    controller: Arc<FailoverController>,
}

impl SessionForwarder {
    pub fn new(config: Arc<FailoverConfig>, controller: Arc<FailoverController>) -> Self {
        Self { config, controller }
    }

    /// Serve one client connection to completion.
    pub async fn serve(&self, mut client: TcpStream) -> SessionOutcome {
        let mut epochs = self.controller.subscribe();
        let epoch = *epochs.borrow_and_update();
        let backend_addr = self.config.backend_for(epoch.path);
        let timeout = self.config.health_check.ping_interval();

        let dialed = tokio::select! {
            dialed = connect_with_timeout(backend_addr, timeout) => dialed,
            _ = superseded(&mut epochs, epoch) => {
                tracing::info!(path = %epoch.path, "Path switched while dialing, dropping session");
                return finish(SessionOutcome::FailedOver);
            }
        };

        let mut upstream = match dialed {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(path = %epoch.path, error = %e, "Dial failed");
                metrics::record_dial_failure(epoch.path);
                self.controller.report_dial_failure(epoch.generation);
                return finish(SessionOutcome::DialFailed);
            }
        };

        tracing::info!(
            path = %epoch.path,
            from = %display_addr(client.local_addr()),
            to = %display_addr(upstream.peer_addr()),
            "Forwarding"
        );

        let to_backend = AtomicU64::new(0);
        let to_client = AtomicU64::new(0);

        let outcome = {
            let (mut client_read, mut client_write) = client.split();
            let (mut upstream_read, mut upstream_write) = upstream.split();

            tokio::select! {
                result = pump(&mut client_read, &mut upstream_write, &to_backend) => {
                    log_direction_end("client_to_backend", result);
                    SessionOutcome::ClientClosed
                }
                result = pump(&mut upstream_read, &mut client_write, &to_client) => {
                    log_direction_end("backend_to_client", result);
                    SessionOutcome::BackendClosed
                }
                _ = superseded(&mut epochs, epoch) => SessionOutcome::FailedOver,
            }
        };

        // Both sockets close here, whichever side ended first.
        drop(client);
        drop(upstream);

        let to_backend = to_backend.into_inner();
        let to_client = to_client.into_inner();
        metrics::record_bytes(to_backend, to_client);

        match outcome {
            SessionOutcome::FailedOver => tracing::info!(
                path = %epoch.path,
                bytes_to_backend = to_backend,
                bytes_to_client = to_client,
                "Session torn down by path switch"
            ),
            _ => tracing::info!(
                path = %epoch.path,
                bytes_to_backend = to_backend,
                bytes_to_client = to_client,
                "Connection closed by application"
            ),
        }

        finish(outcome)
    }
}

fn finish(outcome: SessionOutcome) -> SessionOutcome {
    metrics::record_session(outcome);
    outcome
}

/// Resolves once the controller has left `epoch`.
async fn superseded(epochs: &mut watch::Receiver<Epoch>, epoch: Epoch) {
    // A dropped controller also ends the session.
    let _ = epochs.wait_for(|current| current.generation != epoch.generation).await;
}

/// Copy `reader` into `writer` until end-of-stream.
async fn pump<R, W>(reader: &mut R, writer: &mut W, copied: &AtomicU64) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; SPLICE_BUFFER_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        writer.write_all(&buf[..n]).await?;
        copied.fetch_add(n as u64, Ordering::Relaxed);
    }
}

fn log_direction_end(direction: &'static str, result: io::Result<()>) {
    match result {
        Ok(()) => tracing::debug!(direction, "Stream reached end"),
        Err(e) => tracing::debug!(direction, error = %e, "Stream errored, closing session"),
    }
}

fn display_addr(addr: io::Result<std::net::SocketAddr>) -> String {
    addr.map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
