//! WebSocket sink for CRAES orders.

use anyhow::Context;
use craes_sink_server::config::Config;
use craes_sink_server::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        addr = %config.socket_addr_string(),
        policy = %config.policy,
        max_orders = ?config.max_orders_per_connection,
        auth = config.auth.is_some(),
        "Starting craes-sink-server"
    );

    server::run(config).await.context("sink server failed")
}
