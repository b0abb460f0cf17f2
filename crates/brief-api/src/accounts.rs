//! Handlers for `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/accounts` | Body: `{"name":"Acme Corp"}` |
//! | `GET`  | `/accounts/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use brief_core::{account::Account, store::ActivityStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{Pipeline, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /accounts`, body: `{"name":"Acme Corp"}`
pub async fn create<S>(
  State(pipeline): State<Pipeline<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ActivityStore,
{
  let name = body.name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("account name must not be empty".into()));
  }
  let account = pipeline
    .store()
    .add_account(name.to_owned())
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(account)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /accounts/:id`
pub async fn get_one<S>(
  State(pipeline): State<Pipeline<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Account>, ApiError>
where
  S: ActivityStore,
{
  let account = pipeline
    .store()
    .get_account(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;
  Ok(Json(account))
}
