//! Handlers for `/expenses` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/expenses` | Optional `?account_id=` |
//! | `POST` | `/expenses` | Body: [`AcceptExpense`]; returns 201 + [`AcceptedExpense`] |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
};
use brief_core::{expense::ExpenseLineItem, store::ActivityStore};
use brief_genai::{AcceptExpense, AcceptedExpense};
use serde::Deserialize;
use uuid::Uuid;

use crate::{Pipeline, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub account_id: Option<Uuid>,
}

/// `GET /expenses[?account_id=<uuid>]`
pub async fn list<S>(
  State(pipeline): State<Pipeline<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ExpenseLineItem>>, ApiError>
where
  S: ActivityStore,
{
  let items = pipeline
    .store()
    .list_expenses(params.account_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(items))
}

// ─── Accept ───────────────────────────────────────────────────────────────────

/// `POST /expenses`
pub async fn accept<S>(
  State(pipeline): State<Pipeline<S>>,
  Json(body): Json<AcceptExpense>,
) -> Result<(StatusCode, Json<AcceptedExpense>), ApiError>
where
  S: ActivityStore,
{
  let accepted = pipeline.accept(body).await?;
  Ok((StatusCode::CREATED, Json(accepted)))
}
