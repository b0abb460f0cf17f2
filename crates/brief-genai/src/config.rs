//! Endpoint configuration, passed into [`crate::GenAiClient::new`].

use std::fmt;

use serde::Deserialize;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Where and how to reach the generative-AI endpoint.
///
/// Deserialised from the `[genai]` table of the server configuration.
#[derive(Clone, Deserialize)]
pub struct GenAiConfig {
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(default = "default_model")]
  pub model:        String,
  /// Sent as the `key` query parameter. Required.
  #[serde(default)]
  pub api_key:      String,
  /// Overall request timeout. `None` leaves the transport default in place.
  #[serde(default)]
  pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_model() -> String { DEFAULT_MODEL.to_owned() }

impl GenAiConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      base_url:     default_base_url(),
      model:        default_model(),
      api_key:      api_key.into(),
      timeout_secs: None,
    }
  }

  pub fn validate(&self) -> Result<()> {
    if self.api_key.trim().is_empty() {
      return Err(Error::MissingConfig("genai.api_key"));
    }
    if self.base_url.trim().is_empty() {
      return Err(Error::MissingConfig("genai.base_url"));
    }
    if self.model.trim().is_empty() {
      return Err(Error::MissingConfig("genai.model"));
    }
    Ok(())
  }
}

impl fmt::Debug for GenAiConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GenAiConfig")
      .field("base_url", &self.base_url)
      .field("model", &self.model)
      .field("api_key", &"<redacted>")
      .field("timeout_secs", &self.timeout_secs)
      .finish()
  }
}
