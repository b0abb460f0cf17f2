//! [`SummaryResponse`]: the caller-facing result of a pipeline invocation.

use brief_core::expense::ExtractedExpense;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Prefix added to 401 failures.
pub const AUTH_HINT: &str =
  "Authentication failed: check that the generative AI API key is configured correctly.";

/// Outcome of one summarize or extract call.
///
/// On success exactly one of `summary` / `fields` is set; on failure
/// `error_message` is set, plus `status_code` when the endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
  pub is_success:    bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fields:        Option<ExtractedExpense>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status_code:   Option<u16>,
}

impl SummaryResponse {
  pub fn summary(text: impl Into<String>) -> Self {
    Self {
      is_success:    true,
      summary:       Some(text.into()),
      fields:        None,
      error_message: None,
      status_code:   Some(200),
    }
  }

  /// A summary produced without contacting the endpoint; carries no
  /// `status_code`.
  pub fn local_summary(text: impl Into<String>) -> Self {
    Self { status_code: None, ..Self::summary(text) }
  }

  pub fn fields(fields: ExtractedExpense) -> Self {
    Self {
      is_success:    true,
      summary:       None,
      fields:        Some(fields),
      error_message: None,
      status_code:   Some(200),
    }
  }

  pub fn failure(err: &Error) -> Self {
    Self {
      is_success:    false,
      summary:       None,
      fields:        None,
      error_message: Some(user_message(err)),
      status_code:   err.status_code(),
    }
  }
}

/// Human-readable message for `err`. Internal detail beyond the error's own
/// message is never included.
pub fn user_message(err: &Error) -> String {
  match err {
    Error::Validation(msg) => msg.clone(),
    Error::MissingField(key) => format!("Missing required field: {key}"),
    Error::MissingConfig(key) => {
      format!("Generative AI is not configured: missing {key}")
    }
    Error::Upstream { status: 401, status_text, body } => {
      format!("{AUTH_HINT} Gemini API error: 401 {status_text} - {body}")
    }
    Error::Upstream { status, status_text, body } => {
      format!("Gemini API error: {status} {status_text} - {body}")
    }
    Error::InvalidResponseFormat(detail) => {
      format!("Invalid response format from Gemini API: {detail}")
    }
    Error::InvalidExtraction(detail) => {
      format!("Could not read expense details from the response: {detail}")
    }
    Error::Transport(_) | Error::Json(_) | Error::Store(_) => {
      format!("Error generating summary: {err}")
    }
  }
}
