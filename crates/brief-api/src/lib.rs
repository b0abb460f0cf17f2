//! JSON REST API for the activity briefing service.
//!
//! Exposes an axum [`Router`] backed by a [`SummaryPipeline`] over any
//! [`brief_core::store::ActivityStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", brief_api::api_router(pipeline.clone()))
//! ```

pub mod accounts;
pub mod activities;
pub mod error;
pub mod expenses;
pub mod files;
pub mod summaries;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use brief_core::store::ActivityStore;
use brief_genai::SummaryPipeline;

pub use error::ApiError;

/// Shared handler state.
pub type Pipeline<S> = Arc<SummaryPipeline<S>>;

/// Build a fully-materialised API router for `pipeline`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(pipeline: Pipeline<S>) -> Router<()>
where
  S: ActivityStore + 'static,
{
  Router::new()
    // Accounts
    .route("/accounts", post(accounts::create::<S>))
    .route("/accounts/{id}", get(accounts::get_one::<S>))
    // Activity
    .route(
      "/accounts/{id}/activities",
      get(activities::list::<S>).post(activities::create::<S>),
    )
    // Summaries
    .route("/summaries", post(summaries::create::<S>))
    // Files
    .route("/files", post(files::upload::<S>))
    .route("/files/{id}/extract", post(files::extract::<S>))
    // Expenses
    .route("/expenses", get(expenses::list::<S>).post(expenses::accept::<S>))
    .with_state(pipeline)
}
