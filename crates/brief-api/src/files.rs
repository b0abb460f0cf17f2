//! Handlers for `/files` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/files` | Body: `{"file_name":"r.png","mime_type":"image/png","data":"<base64>"}` |
//! | `POST` | `/files/:id/extract` | Runs expense extraction; always 200 + `SummaryResponse` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use brief_core::{file::NewFile, store::ActivityStore};
use brief_genai::SummaryResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::{Pipeline, error::ApiError};

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadBody {
  pub file_name: String,
  pub mime_type: String,
  /// Base64 (standard alphabet, padded) file content.
  pub data:      String,
}

/// `POST /files`: returns 201 + the stored version's metadata.
pub async fn upload<S>(
  State(pipeline): State<Pipeline<S>>,
  Json(body): Json<UploadBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ActivityStore,
{
  if body.file_name.trim().is_empty() {
    return Err(ApiError::BadRequest("file_name must not be empty".into()));
  }
  if body.mime_type.trim().is_empty() {
    return Err(ApiError::BadRequest("mime_type must not be empty".into()));
  }
  let content = B64
    .decode(body.data.trim())
    .map_err(|e| ApiError::BadRequest(format!("data is not valid base64: {e}")))?;

  let version = pipeline
    .store()
    .store_file(NewFile::from_file_name(
      body.file_name.trim(),
      body.mime_type.trim(),
      content,
    ))
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    file_version_id = %version.file_version_id,
    size = version.size,
    "file uploaded"
  );
  Ok((StatusCode::CREATED, Json(version)))
}

// ─── Extract ──────────────────────────────────────────────────────────────────

/// `POST /files/:id/extract`
pub async fn extract<S>(
  State(pipeline): State<Pipeline<S>>,
  Path(id): Path<Uuid>,
) -> Json<SummaryResponse>
where
  S: ActivityStore,
{
  Json(pipeline.extract(id).await)
}
