//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ConnectionId`.
//! - Spawns a task per connection that performs the WebSocket handshake
//!   and answers orders (see `connection`).

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::connection::{self, ConnectionId};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> ConnectionId {
    ConnectionId(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
}

/// A bound, not yet serving, sink.
pub struct SinkServer {
    listener: TcpListener,
    config: Arc<Config>,
}

impl SinkServer {
    pub async fn bind(config: Config) -> io::Result<Self> {
        let listener = TcpListener::bind(config.socket_addr_string()).await?;
        Ok(SinkServer {
            listener,
            config: Arc::new(config),
        })
    }

    /// Actual bound address (useful when the configured port is `0`).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever.
    pub async fn serve(self) -> io::Result<()> {
        info!(
            addr = %self.local_addr()?,
            policy = %self.config.policy,
            "Start WebSocket endpoint, listening for orders"
        );

        loop {
            let (stream, peer_addr) = self.listener.accept().await?;
            let conn_id = next_connection_id();
            info!(conn = conn_id.0, peer = %peer_addr, "Accepted connection");

            let config = Arc::clone(&self.config);
            tokio::spawn(async move {
                if let Err(e) = connection::run_connection(conn_id, stream, config).await {
                    warn!(conn = conn_id.0, error = %e, "Connection error");
                }
            });
        }
    }
}

/// Bind and serve with the given configuration.
pub async fn run(config: Config) -> io::Result<()> {
    SinkServer::bind(config).await?.serve().await
}
