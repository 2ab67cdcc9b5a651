mod api;
mod cache;
mod config;
mod db;
mod models;

use chrono::Duration;
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use api::AppState;
use cache::ResponseCache;
use db::Database;

#[derive(Parser, Debug)]
#[command(name = "trackd")]
#[command(about = "A small issue tracker REST API with a read-through response cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/trackd/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Port to listen on (overrides config)
  #[arg(short, long)]
  port: Option<u16>,

  /// Path to the SQLite database (overrides config and TRACKD_DB)
  #[arg(short, long)]
  database: Option<PathBuf>,

  /// Seed the database with sample data before serving
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trackd=info,tower_http=info")),
    )
    .init();

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Apply command-line overrides
  if let Some(port) = args.port {
    config.server.port = port;
  }

  let db_path = match args.database {
    Some(path) => path,
    None => config.database_path()?,
  };

  let db = Arc::new(Database::open(&db_path)?);

  if args.seed {
    db::seed::run(&db, 1000)?;
  }

  let cache = ResponseCache::new().with_ttl(Duration::seconds(config.cache.ttl_secs as i64));
  let state = AppState::new(db, cache);

  api::serve(&config.server, state).await
}
