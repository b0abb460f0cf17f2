//! Handlers for `/accounts/:id/activities`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/accounts/:id/activities` | Optional `?limit=` per kind; newest first |
//! | `POST` | `/accounts/:id/activities` | Body: [`NewActivityBody`]; returns 201 + normalized record |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use brief_core::{
  activity::{ActivityRecord, NewEmail, NewEvent, NewTask},
  store::ActivityStore,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{Pipeline, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Rows fetched per activity kind; defaults to the pipeline's limit.
  pub limit: Option<usize>,
}

/// `GET /accounts/:id/activities[?limit=N]`
pub async fn list<S>(
  State(pipeline): State<Pipeline<S>>,
  Path(account_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ActivityRecord>>, ApiError>
where
  S: ActivityStore,
{
  let records = pipeline.activities(account_id, params.limit).await?;
  Ok(Json(records))
}

// ─── Create ───────────────────────────────────────────────────────────────────

fn default_task_status() -> String { "Not Started".to_owned() }

/// JSON body accepted by `POST /accounts/:id/activities`, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NewActivityBody {
  Task {
    subject:     Option<String>,
    description: Option<String>,
    #[serde(default = "default_task_status")]
    status:      String,
    created_at:  Option<DateTime<Utc>>,
  },
  Event {
    subject:     Option<String>,
    description: Option<String>,
    created_at:  Option<DateTime<Utc>>,
  },
  Email {
    subject:    Option<String>,
    text_body:  Option<String>,
    created_at: Option<DateTime<Utc>>,
  },
}

/// `POST /accounts/:id/activities`: returns 201 + the record as it will
/// appear in summaries.
pub async fn create<S>(
  State(pipeline): State<Pipeline<S>>,
  Path(account_id): Path<Uuid>,
  Json(body): Json<NewActivityBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ActivityStore,
{
  let store = pipeline.store();
  if store
    .get_account(account_id)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("account {account_id} not found")));
  }

  let record: ActivityRecord = match body {
    NewActivityBody::Task { subject, description, status, created_at } => store
      .record_task(NewTask { account_id, subject, description, status, created_at })
      .await
      .map_err(ApiError::store)?
      .into(),
    NewActivityBody::Event { subject, description, created_at } => store
      .record_event(NewEvent { account_id, subject, description, created_at })
      .await
      .map_err(ApiError::store)?
      .into(),
    NewActivityBody::Email { subject, text_body, created_at } => store
      .record_email(NewEmail { account_id, subject, text_body, created_at })
      .await
      .map_err(ApiError::store)?
      .into(),
  };

  Ok((StatusCode::CREATED, Json(record)))
}
