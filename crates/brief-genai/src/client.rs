//! Async HTTP client for the `generateContent` endpoint.

use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{debug, warn};

use crate::{Error, GenAiConfig, Result, wire::GenerateContentRequest};

/// Status line and body of one upstream reply, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
  pub status:      u16,
  pub status_text: String,
  pub body:        String,
}

impl RawResponse {
  pub fn is_ok(&self) -> bool { self.status == 200 }

  /// `Ok(body)` on 200, [`Error::Upstream`] otherwise.
  pub fn into_ok_body(self) -> Result<String> {
    if self.is_ok() {
      Ok(self.body)
    } else {
      Err(Error::Upstream {
        status:      self.status,
        status_text: self.status_text,
        body:        self.body,
      })
    }
  }
}

/// Client for one configured model.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone, Debug)]
pub struct GenAiClient {
  http:   Client,
  config: GenAiConfig,
}

impl GenAiClient {
  /// Validate `config` and build the HTTP client.
  pub fn new(config: GenAiConfig) -> Result<Self> {
    config.validate()?;
    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(Self { http: builder.build()?, config })
  }

  pub fn config(&self) -> &GenAiConfig { &self.config }

  /// `<base_url>/v1/models/<model>:generateContent`, without the key.
  fn url(&self) -> String {
    format!(
      "{}/v1/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }

  /// Send one request. Any status is returned as-is; only transport failures
  /// are errors. No retry.
  pub async fn invoke(&self, request: &GenerateContentRequest) -> Result<RawResponse> {
    let body = serde_json::to_vec(request)?;
    debug!(model = %self.config.model, bytes = body.len(), "sending generateContent request");

    let resp = self
      .http
      .post(self.url())
      .query(&[("key", self.config.api_key.as_str())])
      .header(CONTENT_TYPE, "application/json")
      .body(body)
      .send()
      .await?;

    let status = resp.status();
    let body = resp.text().await?;
    let raw = RawResponse {
      status:      status.as_u16(),
      status_text: status.canonical_reason().unwrap_or_default().to_owned(),
      body,
    };

    if raw.is_ok() {
      debug!(status = raw.status, "generateContent succeeded");
    } else {
      warn!(status = raw.status, body = %raw.body, "generateContent returned an error status");
    }
    Ok(raw)
  }

  /// [`invoke`](Self::invoke) and require a 200.
  pub async fn generate(&self, request: &GenerateContentRequest) -> Result<String> {
    self.invoke(request).await?.into_ok_body()
  }
}
