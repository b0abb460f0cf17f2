//! Wiring for the briefing server: configuration, store, pipeline, router.

use std::{
  collections::HashMap,
  num::NonZeroUsize,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use brief_core::{selector::DEFAULT_ACTIVITY_LIMIT, store::ActivityStore};
use brief_genai::{GenAiClient, GenAiConfig, SummaryPipeline};
use brief_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Prefix for environment overrides, e.g. `BRIEF_GENAI__API_KEY`.
pub const ENV_PREFIX: &str = "BRIEF";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `brief.toml` plus `BRIEF_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Rows fetched per activity kind when a request does not pass `limit`.
  #[serde(default = "default_activity_limit")]
  pub activity_limit: NonZeroUsize,
  #[serde(default = "default_genai")]
  pub genai:          GenAiConfig,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/brief/brief.db") }

fn default_activity_limit() -> NonZeroUsize { DEFAULT_ACTIVITY_LIMIT }

fn default_genai() -> GenAiConfig { GenAiConfig::new("") }

impl ServerConfig {
  /// Load from an optional TOML file, overridden by the process environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with_env(path, None)
  }

  /// As [`ServerConfig::load`], reading overrides from `env` when given
  /// instead of the process environment.
  pub fn load_with_env(
    path: &Path,
    env: Option<HashMap<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__")
          .source(env),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Open the SQLite store named by `cfg.store_path`, creating its directory.
pub async fn open_store(cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  let store_path = expand_tilde(&cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))
}

/// Build the pipeline; fails if the generative endpoint is not configured.
pub fn build_pipeline<S: ActivityStore>(
  store: Arc<S>,
  cfg: &ServerConfig,
) -> anyhow::Result<Arc<SummaryPipeline<S>>> {
  let client =
    GenAiClient::new(cfg.genai.clone()).context("invalid [genai] configuration")?;
  Ok(Arc::new(
    SummaryPipeline::new(store, client).with_default_limit(cfg.activity_limit),
  ))
}

/// The full application: the JSON API under `/api`, with request tracing.
pub fn app<S: ActivityStore + 'static>(pipeline: Arc<SummaryPipeline<S>>) -> Router {
  Router::new()
    .nest("/api", brief_api::api_router(pipeline))
    .layer(TraceLayer::new_for_http())
}
