//! tandb Server Binary
//!
//! In-memory key-value server with sets and sorted sets.

use clap::Parser;
use std::time::Duration;
use tandb::{Config, Server};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// tandb server - in-memory key-value store
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Bind address
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Port number
    #[arg(short, long, default_value_t = 6380)]
    port: u16,

    /// Expiration sweep interval in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_ms: u64,

    /// Longest accepted request line in bytes
    #[arg(long, default_value_t = tandb::protocol::DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tandb=info".parse()?))
        .init();

    let args = Args::parse();

    let config = Config::default()
        .with_bind(&args.bind)
        .with_port(args.port)
        .with_sweep_interval(Duration::from_millis(args.sweep_interval_ms))
        .with_max_line_length(args.max_line_length);

    info!(
        "Starting tandb on {}:{} (sweep every {:?})",
        args.bind, args.port, config.sweep_interval
    );

    Server::new(config).run().await?;

    Ok(())
}
