//! qrwatchd — the qrwatch server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API under `/api`.

mod settings;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use qrwatch_api::ApiState;
use qrwatch_scanner::{RescanConfig, Rescanner, UrlhausClient};
use qrwatch_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "qrwatch monitoring server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let sources = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("QRWATCH"))
    .build()
    .context("failed to read config file")?;

  let settings: ServerConfig = sources
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&settings.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let rescanner = Rescanner::new(
    settings.comparison_policy,
    RescanConfig {
      timeout:       Duration::from_secs(settings.rescan_timeout_secs),
      max_redirects: settings.rescan_max_redirects,
    },
  )
  .context("failed to build re-scanner HTTP client")?;

  let reputation = if settings.reputation_enabled {
    Some(Arc::new(
      UrlhausClient::with_endpoint(settings.reputation_endpoint.clone())
        .context("failed to build reputation client")?,
    ))
  } else {
    None
  };

  // Build application state.
  let state = ApiState {
    store: Arc::new(store),
    policy: settings.comparison_policy,
    rescanner: Arc::new(rescanner),
    reputation,
  };

  let app = Router::new()
    .nest("/api", qrwatch_api::api_router(state))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", settings.host, settings.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
