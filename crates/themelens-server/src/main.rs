//! Themelens Fixture Server
//!
//! Serves a dashboard bundle and keyword-overlap inference for local use and
//! end-to-end tests.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use themelens_server::server::start_server;

#[derive(Parser)]
#[command(name = "themelens-server")]
#[command(about = "Themelens fixture backend")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, default_value = "127.0.0.1:5000")]
  bind: SocketAddr,

  /// Dashboard bundle to serve
  #[arg(long, default_value = "data/dashboardData.json")]
  data: PathBuf,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("themelens_server=debug,tower_http=debug,info")
  } else {
    EnvFilter::new("themelens_server=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Themelens fixture server v{}", env!("CARGO_PKG_VERSION"));
  start_server(args.bind, &args.data).await
}
