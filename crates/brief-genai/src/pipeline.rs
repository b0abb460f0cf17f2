//! [`SummaryPipeline`]: selector → normalizer → prompt → endpoint → parser.
//!
//! Each call walks `START → PROMPT_BUILT → REQUEST_SENT`, then either
//! `RESPONSE_OK → PARSED → DONE` or ends at `DONE(error)` after a non-200
//! reply or a transport failure. Nothing is retried and no state is kept
//! between calls.

use std::{num::NonZeroUsize, sync::Arc};

use brief_core::{
  activity::ActivityRecord,
  expense::{ExpenseLineItem, ExtractedExpense, NewExpense},
  file::FileVersion,
  normalize::normalize,
  selector::{DEFAULT_ACTIVITY_LIMIT, select_recent},
  store::ActivityStore,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
  Error, GenAiClient, Result, SummaryResponse,
  parse::{parse_extraction, parse_summary},
  prompt::{NO_ACTIVITY_SUMMARY, build_extraction_prompt, build_prompt},
  wire::GenerateContentRequest,
};

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

// ─── Accept flow types ───────────────────────────────────────────────────────

/// A user-confirmed extraction to persist.
#[derive(Debug, Clone, Deserialize)]
pub struct AcceptExpense {
  pub fields:          ExtractedExpense,
  #[serde(default)]
  pub account_id:      Option<Uuid>,
  /// The uploaded receipt; when set, a copy is stored under a title derived
  /// from the line item.
  #[serde(default)]
  pub file_version_id: Option<Uuid>,
}

/// Result of [`SummaryPipeline::accept`].
///
/// The line item is created first. If storing the renamed receipt copy then
/// fails, the line item stays and `rename_error` says why.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedExpense {
  pub line_item:    ExpenseLineItem,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub renamed_file: Option<FileVersion>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rename_error: Option<String>,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

pub struct SummaryPipeline<S> {
  store:         Arc<S>,
  client:        GenAiClient,
  default_limit: NonZeroUsize,
}

impl<S: ActivityStore> SummaryPipeline<S> {
  pub fn new(store: Arc<S>, client: GenAiClient) -> Self {
    Self { store, client, default_limit: DEFAULT_ACTIVITY_LIMIT }
  }

  /// Rows fetched per activity kind when a call does not pass a limit.
  pub fn with_default_limit(mut self, limit: NonZeroUsize) -> Self {
    self.default_limit = limit;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  fn resolve_limit(&self, limit: Option<usize>) -> Result<NonZeroUsize> {
    match limit {
      None => Ok(self.default_limit),
      Some(n) => NonZeroUsize::new(n)
        .ok_or_else(|| Error::Validation("limit must be a positive integer".into())),
    }
  }

  // ── Activity ──────────────────────────────────────────────────────────────

  /// Select and normalize recent activity for `account_id`, newest first.
  pub async fn activities(
    &self,
    account_id: Uuid,
    limit: Option<usize>,
  ) -> Result<Vec<ActivityRecord>> {
    let limit = self.resolve_limit(limit)?;
    let rows = select_recent(self.store.as_ref(), account_id, limit)
      .await
      .map_err(store_err)?;
    Ok(normalize(rows))
  }

  // ── Summarize ─────────────────────────────────────────────────────────────

  /// Summarize recent activity for an account.
  ///
  /// Never fails: every error is folded into a failed [`SummaryResponse`].
  pub async fn summarize(
    &self,
    account_id: Option<Uuid>,
    limit: Option<usize>,
  ) -> SummaryResponse {
    match self.try_summarize(account_id, limit).await {
      Ok(response) => response,
      Err(e) => {
        log_failure("summarize", &e);
        SummaryResponse::failure(&e)
      }
    }
  }

  async fn try_summarize(
    &self,
    account_id: Option<Uuid>,
    limit: Option<usize>,
  ) -> Result<SummaryResponse> {
    let account_id =
      account_id.ok_or_else(|| Error::Validation("Account ID is required".into()))?;
    info!(%account_id, "summarizing account activity");

    let records = self.activities(account_id, limit).await?;
    if records.is_empty() {
      debug!(%account_id, "no activity; skipping generation");
      return Ok(SummaryResponse::local_summary(NO_ACTIVITY_SUMMARY));
    }

    let prompt = build_prompt(&records);
    debug!(%account_id, records = records.len(), "prompt built");

    let body = self
      .client
      .generate(&GenerateContentRequest::text(prompt))
      .await?;
    let summary = parse_summary(&body)?;
    info!(%account_id, chars = summary.len(), "summary generated");
    Ok(SummaryResponse::summary(summary))
  }

  // ── Extract ───────────────────────────────────────────────────────────────

  /// Extract expense fields from an uploaded file version.
  ///
  /// Never fails: every error is folded into a failed [`SummaryResponse`].
  pub async fn extract(&self, file_version_id: Uuid) -> SummaryResponse {
    match self.try_extract(file_version_id).await {
      Ok(fields) => SummaryResponse::fields(fields),
      Err(e) => {
        log_failure("extract", &e);
        SummaryResponse::failure(&e)
      }
    }
  }

  async fn try_extract(&self, file_version_id: Uuid) -> Result<ExtractedExpense> {
    let document = self.require_file(file_version_id).await?;
    info!(%file_version_id, mime_type = %document.mime_type, "extracting expense");

    let request = build_extraction_prompt(&document).into_request();
    debug!(%file_version_id, "prompt built");

    let body = self.client.generate(&request).await?;
    let fields = parse_extraction(&body)?;
    info!(%file_version_id, vendor = %fields.vendor_name, "expense extracted");
    Ok(fields)
  }

  async fn require_file(&self, id: Uuid) -> Result<FileVersion> {
    self
      .store
      .get_file_version(id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::Validation(format!("file version {id} not found")))
  }

  async fn require_account(&self, id: Uuid) -> Result<()> {
    match self.store.get_account(id).await.map_err(store_err)? {
      Some(_) => Ok(()),
      None => Err(Error::Validation(format!("account {id} not found"))),
    }
  }

  // ── Accept ────────────────────────────────────────────────────────────────

  /// Persist an accepted extraction as a line item, then store a renamed copy
  /// of the receipt if one was given.
  pub async fn accept(&self, input: AcceptExpense) -> Result<AcceptedExpense> {
    let new = NewExpense::from_extracted(
      &input.fields,
      input.account_id,
      input.file_version_id,
    )?;

    if let Some(id) = input.account_id {
      self.require_account(id).await?;
    }
    if let Some(id) = input.file_version_id {
      self.require_file(id).await?;
    }

    let line_item = self.store.insert_expense(new).await.map_err(store_err)?;
    info!(expense_id = %line_item.expense_id, "expense line item created");

    let Some(file_version_id) = input.file_version_id else {
      return Ok(AcceptedExpense { line_item, renamed_file: None, rename_error: None });
    };

    match self
      .store
      .duplicate_file_version(file_version_id, line_item.receipt_title())
      .await
    {
      Ok(copy) => Ok(AcceptedExpense {
        line_item,
        renamed_file: Some(copy),
        rename_error: None,
      }),
      Err(e) => {
        warn!(
          expense_id = %line_item.expense_id,
          %file_version_id,
          error = %e,
          "line item created but receipt copy failed"
        );
        Ok(AcceptedExpense {
          line_item,
          renamed_file: None,
          rename_error: Some(e.to_string()),
        })
      }
    }
  }
}

fn log_failure(operation: &str, e: &Error) {
  match e {
    Error::Validation(_) | Error::MissingField(_) | Error::MissingConfig(_) => {
      debug!(operation, error = %e, "rejected request");
    }
    Error::Upstream { status, .. } => {
      warn!(operation, status, "upstream error");
    }
    Error::InvalidResponseFormat(_) | Error::InvalidExtraction(_) => {
      warn!(operation, error = %e, "unexpected response shape");
    }
    Error::Transport(_) | Error::Json(_) | Error::Store(_) => {
      error!(operation, error = ?e, "pipeline failure");
    }
  }
}
