//! Handler for `POST /summaries`.
//!
//! Always answers 200 with a [`SummaryResponse`]; failures are reported in
//! the body (`isSuccess: false`, `errorMessage`, `statusCode`).

use axum::{Json, extract::State};
use brief_core::store::ActivityStore;
use brief_genai::SummaryResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::Pipeline;

#[derive(Debug, Deserialize, Default)]
pub struct SummaryBody {
  pub account_id: Option<Uuid>,
  pub limit:      Option<usize>,
}

/// `POST /summaries`, body: `{"account_id":"...","limit":10}`
pub async fn create<S>(
  State(pipeline): State<Pipeline<S>>,
  Json(body): Json<SummaryBody>,
) -> Json<SummaryResponse>
where
  S: ActivityStore,
{
  Json(pipeline.summarize(body.account_id, body.limit).await)
}
