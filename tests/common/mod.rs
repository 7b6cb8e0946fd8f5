//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};

use rtt_failover::net::listener::Listener;
use rtt_failover::{FailoverConfig, FailoverController, FailoverProxy, Shutdown};

/// Start an echo backend that first greets every connection with `banner`.
pub async fn start_backend(banner: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        if socket.write_all(banner).await.is_err() {
                            return;
                        }
                        let (mut reader, mut writer) = socket.split();
                        let _ = tokio::io::copy(&mut reader, &mut writer).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that writes `farewell` to every connection and hangs up.
#[allow(dead_code)]
pub async fn start_closing_backend(farewell: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let _ = socket.write_all(farewell).await;
        }
    });

    addr
}

/// A backend that never completes a handshake.
///
/// The listener never accepts and its queue is filled up front, so further
/// connects hang until the caller gives up.
#[allow(dead_code)]
pub struct StalledBackend {
    pub addr: SocketAddr,
    _listener: TcpListener,
    _queued: Vec<TcpStream>,
}

#[allow(dead_code)]
pub async fn stalled_backend() -> StalledBackend {
    let socket = TcpSocket::new_v4().unwrap();
    socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let listener = socket.listen(1).unwrap();
    let addr = listener.local_addr().unwrap();

    let mut queued = Vec::new();
    for _ in 0..16 {
        match tokio::time::timeout(Duration::from_millis(200), TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => queued.push(stream),
            _ => break,
        }
    }

    StalledBackend {
        addr,
        _listener: listener,
        _queued: queued,
    }
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A running relay under test.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub controller: Arc<FailoverController>,
    pub shutdown: Shutdown,
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the relay on an ephemeral loopback port.
pub async fn start_proxy(mut config: FailoverConfig) -> TestProxy {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let proxy = FailoverProxy::new(config);
    let controller = proxy.controller();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = proxy.run(listener, server_shutdown).await;
    });

    TestProxy {
        addr,
        controller,
        shutdown,
    }
}

/// Read exactly `len` bytes, failing the test after `deadline`.
#[allow(dead_code)]
pub async fn read_n(stream: &mut TcpStream, len: usize, deadline: Duration) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    tokio::time::timeout(deadline, stream.read_exact(&mut buf))
        .await
        .expect("read timed out")
        .expect("read failed");
    buf
}

/// Wait for the peer to close, returning whatever arrived first.
///
/// A reset counts as a close.
#[allow(dead_code)]
pub async fn read_until_closed(stream: &mut TcpStream, deadline: Duration) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = tokio::time::timeout(deadline, stream.read_to_end(&mut buf))
        .await
        .expect("connection was not closed in time");
    buf
}
