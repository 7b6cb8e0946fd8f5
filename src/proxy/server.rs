//! Accept loop and subsystem wiring.
//!
//! # Responsibilities
//! - Own the shared configuration and failover controller
//! - Run the health monitor beside the accept loop
//! - Spawn one forwarding task per accepted connection

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::FailoverConfig;
use crate::failover::FailoverController;
use crate::health::HealthMonitor;
use crate::net::connection::SessionTracker;
use crate::net::listener::{Listener, ListenerError};
use crate::proxy::session::SessionForwarder;

/// The failover relay.
pub struct FailoverProxy {
    config: Arc<FailoverConfig>,
    controller: Arc<FailoverController>,
    tracker: SessionTracker,
}

impl FailoverProxy {
    /// Create a relay starting on the major path.
    pub fn new(config: FailoverConfig) -> Self {
        let controller = Arc::new(FailoverController::new(&config));
        Self {
            config: Arc::new(config),
            controller,
            tracker: SessionTracker::new(),
        }
    }

    /// Handle to the failover controller, for inspection.
    pub fn controller(&self) -> Arc<FailoverController> {
        Arc::clone(&self.controller)
    }

    /// Serve until shutdown is signalled or the listener fails.
    ///
    /// An accept error is returned to the caller and is meant to be fatal.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let monitor = HealthMonitor::new(Arc::clone(&self.controller), Arc::clone(&self.config));
        let monitor_handle = tokio::spawn(monitor.run(shutdown.resubscribe()).in_current_span());

        let forwarder = SessionForwarder::new(Arc::clone(&self.config), Arc::clone(&self.controller));

        let result = loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer_addr, permit) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => break Err(e),
                    };

                    let guard = self.tracker.track();
                    let span = tracing::info_span!("session", id = %guard.id(), peer = %peer_addr);
                    let forwarder = forwarder.clone();

                    tokio::spawn(
                        async move {
                            let _permit = permit;
                            let _guard = guard;
                            forwarder.serve(stream).await;
                        }
                        .instrument(span),
                    );
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break Ok(());
                }
            }
        };

        if result.is_err() {
            monitor_handle.abort();
        } else {
            let _ = monitor_handle.await;
        }
        result
    }
}
