//! The `ActivityStore` trait.
//!
//! Implemented by storage backends (e.g. `brief-store-sqlite`). The pipeline
//! and the HTTP layer depend on this abstraction, not on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  account::Account,
  activity::{EmailRow, EventRow, NewEmail, NewEvent, NewTask, TaskRow},
  expense::{ExpenseLineItem, NewExpense},
  file::{FileVersion, NewFile},
};

/// Abstraction over an activity store backend.
///
/// The `recent_*` reads are the query boundary: filter by owning account,
/// order by `created_at` descending, bound by `limit`. An account with no
/// rows (or no account at all) yields an empty vector, never an error.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ActivityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  fn add_account(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Retrieve an account by UUID. Returns `None` if not found.
  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  // ── Activity writes ───────────────────────────────────────────────────

  fn record_task(
    &self,
    input: NewTask,
  ) -> impl Future<Output = Result<TaskRow, Self::Error>> + Send + '_;

  fn record_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<EventRow, Self::Error>> + Send + '_;

  fn record_email(
    &self,
    input: NewEmail,
  ) -> impl Future<Output = Result<EmailRow, Self::Error>> + Send + '_;

  // ── Activity reads ────────────────────────────────────────────────────

  fn recent_tasks(
    &self,
    account_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<TaskRow>, Self::Error>> + Send + '_;

  fn recent_events(
    &self,
    account_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<EventRow>, Self::Error>> + Send + '_;

  fn recent_emails(
    &self,
    account_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<EmailRow>, Self::Error>> + Send + '_;

  // ── Files ─────────────────────────────────────────────────────────────

  /// Persist an uploaded file as the first version of a new document.
  fn store_file(
    &self,
    input: NewFile,
  ) -> impl Future<Output = Result<FileVersion, Self::Error>> + Send + '_;

  /// Retrieve a file version, content included. Returns `None` if not found.
  fn get_file_version(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<FileVersion>, Self::Error>> + Send + '_;

  /// Insert a copy of an existing version under a new title, in the same
  /// document. The original version is left untouched.
  fn duplicate_file_version(
    &self,
    id: Uuid,
    title: String,
  ) -> impl Future<Output = Result<FileVersion, Self::Error>> + Send + '_;

  // ── Expenses ──────────────────────────────────────────────────────────

  fn insert_expense(
    &self,
    input: NewExpense,
  ) -> impl Future<Output = Result<ExpenseLineItem, Self::Error>> + Send + '_;

  /// All line items, newest first; optionally restricted to one account.
  fn list_expenses(
    &self,
    account_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<ExpenseLineItem>, Self::Error>> + Send + '_;
}
