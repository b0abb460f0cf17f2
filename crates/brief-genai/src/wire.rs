//! JSON schema of the `generateContent` request and response bodies.
//!
//! ```json
//! {"contents":[{"parts":[{"text":"..."},{"inline_data":{"mime_type":"..","data":".."}}]}]}
//! {"candidates":[{"content":{"parts":[{"text":"..."}]}}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
  pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
  pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
  Text { text: String },
  InlineData { inline_data: InlineData },
}

/// A binary attachment sent inline, base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
  pub mime_type: String,
  pub data:      String,
}

impl GenerateContentRequest {
  /// A single-turn, text-only request.
  pub fn text(prompt: impl Into<String>) -> Self {
    Self {
      contents: vec![Content {
        parts: vec![Part::Text { text: prompt.into() }],
      }],
    }
  }

  /// A single-turn request with the prompt followed by one attachment.
  pub fn with_attachment(prompt: impl Into<String>, attachment: InlineData) -> Self {
    Self {
      contents: vec![Content {
        parts: vec![
          Part::Text { text: prompt.into() },
          Part::InlineData { inline_data: attachment },
        ],
      }],
    }
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

/// The subset of the response this service reads. Unknown fields
/// (`usageMetadata`, `safetyRatings`, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
  pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
  pub content: CandidateContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
  pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
  pub text: String,
}

impl GenerateContentResponse {
  /// Text of the first part of the first candidate. Further candidates and
  /// parts are ignored.
  pub fn into_first_text(self) -> Result<String> {
    let candidate = self
      .candidates
      .into_iter()
      .next()
      .ok_or_else(|| Error::InvalidResponseFormat("no candidates".into()))?;
    let part = candidate
      .content
      .parts
      .into_iter()
      .next()
      .ok_or_else(|| Error::InvalidResponseFormat("candidate has no parts".into()))?;
    Ok(part.text)
  }
}
