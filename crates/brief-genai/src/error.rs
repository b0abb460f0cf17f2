//! Error type for `brief-genai`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  // ── Validation ──────────────────────────────────────────────────────────
  #[error("missing configuration: {0}")]
  MissingConfig(&'static str),

  #[error("{0}")]
  Validation(String),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  // ── Upstream ────────────────────────────────────────────────────────────
  /// The endpoint answered with a non-200 status.
  #[error("upstream returned {status} {status_text}")]
  Upstream {
    status:      u16,
    status_text: String,
    body:        String,
  },

  // ── Transport / decoding ────────────────────────────────────────────────
  #[error("request failed: {0}")]
  Transport(#[source] reqwest::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  // ── Response shape ──────────────────────────────────────────────────────
  /// Well-formed JSON that does not match the declared response schema.
  #[error("invalid response format: {0}")]
  InvalidResponseFormat(String),

  /// The generated text is not a JSON object.
  #[error("invalid extraction output: {0}")]
  InvalidExtraction(String),
}

impl Error {
  /// The upstream HTTP status, when there was one.
  pub fn status_code(&self) -> Option<u16> {
    match self {
      Self::Upstream { status, .. } => Some(*status),
      _ => None,
    }
  }
}

// Request URLs carry the API key in the query string; keep it out of error
// messages.
impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self { Self::Transport(e.without_url()) }
}

impl From<brief_core::Error> for Error {
  fn from(e: brief_core::Error) -> Self {
    match e {
      brief_core::Error::MissingField(key) => Self::MissingField(key),
      other => Self::Validation(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
