//! brief server binary.
//!
//! Reads `brief.toml` (or the path given with `--config`) plus `BRIEF_*`
//! environment overrides, opens the SQLite store, and either serves the JSON
//! API or runs a single pipeline call from the command line.
//!
//! ```text
//! BRIEF_GENAI__API_KEY=... cargo run -p brief-server -- serve
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use brief_core::file::NewFile;
use brief_core::store::ActivityStore as _;
use brief_server::{ServerConfig, app, build_pipeline, open_store};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about = "Account activity briefing server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "brief.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API (default).
  Serve,
  /// Summarize recent activity for one account and print the response.
  Summarize {
    account_id: Uuid,
    /// Rows fetched per activity kind.
    #[arg(short, long)]
    limit:      Option<usize>,
  },
  /// Store a receipt file, extract its expense fields, and print the response.
  Extract {
    file:      PathBuf,
    /// MIME type of the file; guessed from the extension when omitted.
    #[arg(short, long)]
    mime_type: Option<String>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = Arc::new(open_store(&server_cfg).await?);
  let pipeline = build_pipeline(store, &server_cfg)?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => {
      let address = server_cfg.address();
      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
      axum::serve(listener, app(pipeline))
        .await
        .context("server error")?;
    }
    Command::Summarize { account_id, limit } => {
      let response = pipeline.summarize(Some(account_id), limit).await;
      println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Command::Extract { file, mime_type } => {
      let content = tokio::fs::read(&file)
        .await
        .with_context(|| format!("failed to read {file:?}"))?;
      let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("path has no file name")?;
      let mime_type = mime_type
        .or_else(|| guess_mime_type(&file_name).map(str::to_owned))
        .context("cannot guess MIME type; pass --mime-type")?;

      let version = pipeline
        .store()
        .store_file(NewFile::from_file_name(&file_name, mime_type, content))
        .await
        .context("failed to store file")?;
      tracing::info!(file_version_id = %version.file_version_id, "stored {file_name}");

      let response = pipeline.extract(version.file_version_id).await;
      println!("{}", serde_json::to_string_pretty(&response)?);
    }
  }

  Ok(())
}

fn guess_mime_type(file_name: &str) -> Option<&'static str> {
  let (_, ext) = file_name.rsplit_once('.')?;
  match ext.to_ascii_lowercase().as_str() {
    "pdf" => Some("application/pdf"),
    "png" => Some("image/png"),
    "jpg" | "jpeg" => Some("image/jpeg"),
    "webp" => Some("image/webp"),
    "heic" => Some("image/heic"),
    _ => None,
  }
}
