// crates/craes-client/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use craes_client::ClientConfig;
use craes_core::TradeExecutionResult;
use craes_protocol::csv_codec::read_orders_from_path;
use craes_protocol::OrderCodec;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "craes-client")]
#[clap(about = "Submit orders from a CSV file to CRAES and print the executed trades")]
struct Cli {
    /// Address CRAES is listening on
    #[clap(long, alias = "server_addr")]
    server_addr: Option<String>,

    /// Port CRAES is listening on
    #[clap(long, alias = "server_port")]
    server_port: Option<u16>,

    /// User name to authenticate with
    #[clap(long, alias = "user_name")]
    user_name: Option<String>,

    /// Passphrase to authenticate with
    #[clap(long)]
    passphrase: Option<String>,

    /// CSV file with orders to be sent
    #[clap(long)]
    file: Option<PathBuf>,

    /// TOML file with defaults for the options above
    #[clap(long)]
    config: Option<PathBuf>,

    /// Print responses as JSON
    #[clap(long)]
    json: bool,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_toml_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(addr) = &self.server_addr {
            config.server_addr = addr.clone();
        }
        if let Some(port) = self.server_port {
            config.server_port = port;
        }
        if let Some(user) = &self.user_name {
            config.user_name = user.clone();
        }
        if let Some(pass) = &self.passphrase {
            config.passphrase = pass.clone();
        }
        if let Some(file) = &self.file {
            config.file = file.clone();
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the results.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.resolve_config()?;
    info!(
        server = %config.server_addr,
        port = config.server_port,
        user = %config.user_name,
        file = %config.file.display(),
        "Resolved configuration"
    );

    println!("Loading order file.");
    let orders = read_orders_from_path(&config.file)
        .with_context(|| format!("loading {}", config.file.display()))?;
    println!(
        "Read {} orders successfully. Connect to CRAES.",
        orders.len()
    );

    let codec = OrderCodec::new();
    let results = config
        .session_client()
        .submit_orders(&codec, &orders)
        .await
        .context("order submission failed")?;

    println!("Orders sent. Responses:");
    print_results(&results, cli.json)
}

fn print_results(results: &[TradeExecutionResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        match result.average_price() {
            Some(avg) => println!(
                "  order {:>3}: {} (volume {}, avg price {:.4})",
                i + 1,
                result,
                result.total_volume(),
                avg
            ),
            None => println!("  order {:>3}: {}", i + 1, result),
        }
    }
    Ok(())
}
