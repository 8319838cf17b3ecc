use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use themelens::cli::commands::{self, DocumentQuery};
use themelens::model::ThemeId;
use themelens::notice::NoticeRaised;
use themelens::ClientConfig;

#[derive(Parser)]
#[command(name = "themelens")]
#[command(about = "Themelens - Topic Model Dashboard\nLinked charts, tables and detail views over one dashboard bundle")]
#[command(version)]
struct Cli {
  /// Backend base URL (overrides config file and THEMELENS_SERVER_URL)
  #[arg(long, global = true)]
  server: Option<String>,

  /// Model name sent with every request (overrides THEMELENS_MODEL)
  #[arg(long, global = true)]
  model: Option<String>,

  /// Path to a JSON config file
  #[arg(long, global = true, env = "THEMELENS_CONFIG")]
  config: Option<PathBuf>,

  /// Print views as JSON instead of text
  #[arg(long, global = true)]
  json: bool,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Args)]
struct DocumentFilters {
  /// Only documents with this theme label
  #[arg(long)]
  theme: Option<String>,
  /// Minimum score (ignored if not a number)
  #[arg(long, allow_hyphen_values = true)]
  min: Option<String>,
  /// Maximum score (ignored if not a number)
  #[arg(long, allow_hyphen_values = true)]
  max: Option<String>,
  /// Case-insensitive text search over the visible rows
  #[arg(short, long)]
  search: Option<String>,
}

#[derive(Subcommand)]
enum Command {
  /// Show theme distribution, theme map, documents, diagnostics and metrics
  Overview {
    /// Show model-level metrics instead of theme-level ones
    #[arg(long)]
    model_metrics: bool,
  },
  /// Show the detail view for one theme
  Theme {
    /// Theme id
    id: ThemeId,
  },
  /// Run inference for one document and show its detail view
  Document {
    /// Document id as it appears in the bundle
    id: String,
  },
  /// List documents with optional theme, score and text filters
  Documents {
    #[command(flatten)]
    filters: DocumentFilters,
  },
}

async fn handle(command: Command, config: &ClientConfig, json: bool) -> Result<()> {
  match command {
    Command::Overview { model_metrics } => commands::overview(config, model_metrics, json).await,
    Command::Theme { id } => commands::theme(config, id, json).await,
    Command::Document { id } => commands::document(config, &id, json).await,
    Command::Documents { filters } => {
      let query = DocumentQuery { theme: filters.theme, min: filters.min, max: filters.max, search: filters.search };
      commands::documents(config, query, json).await
    }
  }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  let filter = if cli.verbose { EnvFilter::new("themelens=debug,info") } else { EnvFilter::new("themelens=error,error") };
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  let config = ClientConfig::load(cli.config.as_deref())?.with_overrides(cli.server, cli.model);
  tracing::debug!(base_url = %config.base_url, model = %config.model, "Resolved configuration");

  match handle(cli.command, &config, cli.json).await {
    Ok(()) => Ok(ExitCode::SUCCESS),
    Err(e) if e.is::<NoticeRaised>() => Ok(ExitCode::FAILURE),
    Err(e) => Err(e),
  }
}
