//! Uploaded documents and their stored versions.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored revision of an uploaded document.
///
/// The binary content is never serialized; API responses carry metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVersion {
  pub file_version_id: Uuid,
  /// Versions produced by duplication share the original's document id.
  pub document_id:     Uuid,
  pub title:           String,
  pub file_extension:  Option<String>,
  pub mime_type:       String,
  /// SHA-256 hex digest of `content`.
  pub content_hash:    String,
  pub size:            u64,
  pub created_at:      DateTime<Utc>,
  #[serde(skip)]
  pub content:         Bytes,
}

impl FileVersion {
  /// `title` plus the original extension, if any.
  pub fn file_name(&self) -> String {
    match &self.file_extension {
      Some(ext) => format!("{}.{ext}", self.title),
      None => self.title.clone(),
    }
  }
}

/// Input to [`crate::store::ActivityStore::store_file`].
#[derive(Debug, Clone)]
pub struct NewFile {
  pub title:          String,
  pub file_extension: Option<String>,
  pub mime_type:      String,
  pub content:        Bytes,
}

impl NewFile {
  /// Split `file_name` into title and extension (`receipt.pdf` →
  /// `receipt` + `pdf`). A leading dot is part of the title.
  pub fn from_file_name(
    file_name: &str,
    mime_type: impl Into<String>,
    content: impl Into<Bytes>,
  ) -> Self {
    let (title, file_extension) = match file_name.rsplit_once('.') {
      Some((title, ext)) if !title.is_empty() && !ext.is_empty() => {
        (title.to_owned(), Some(ext.to_owned()))
      }
      _ => (file_name.to_owned(), None),
    };
    Self {
      title,
      file_extension,
      mime_type: mime_type.into(),
      content: content.into(),
    }
  }
}
