//! Integration tests for `SqliteStore` against an in-memory database.

use std::num::NonZeroUsize;

use brief_core::{
  activity::{ActivityKind, NewEmail, NewEvent, NewTask},
  expense::{ExtractedExpense, NewExpense},
  file::NewFile,
  normalize::normalize,
  selector::select_recent,
  store::ActivityStore,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn at(minutes: i64) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn new_task(account_id: Uuid, subject: &str, minutes: i64) -> NewTask {
  NewTask {
    account_id,
    subject:     Some(subject.into()),
    description: Some(format!("{subject} details")),
    status:      "In Progress".into(),
    created_at:  Some(at(minutes)),
  }
}

fn new_event(account_id: Uuid, subject: &str, minutes: i64) -> NewEvent {
  NewEvent {
    account_id,
    subject:     Some(subject.into()),
    description: None,
    created_at:  Some(at(minutes)),
  }
}

fn new_email(account_id: Uuid, subject: &str, minutes: i64) -> NewEmail {
  NewEmail {
    account_id,
    subject:    Some(subject.into()),
    text_body:  Some("Thanks for the call".into()),
    created_at: Some(at(minutes)),
  }
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_account() {
  let s = store().await;

  let account = s.add_account("Acme Corp".into()).await.unwrap();
  let fetched = s.get_account(account.account_id).await.unwrap().unwrap();
  assert_eq!(fetched.account_id, account.account_id);
  assert_eq!(fetched.name, "Acme Corp");
}

#[tokio::test]
async fn get_account_missing_returns_none() {
  let s = store().await;
  assert!(s.get_account(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn recording_activity_for_unknown_account_fails() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s.record_task(new_task(id, "orphan", 0)).await.unwrap_err();
  assert!(matches!(err, Error::AccountNotFound(missing) if missing == id));
}

// ─── Activity reads ──────────────────────────────────────────────────────────

#[tokio::test]
async fn recent_tasks_are_newest_first_and_limited() {
  let s = store().await;
  let account = s.add_account("Acme Corp".into()).await.unwrap();
  for (i, subject) in ["a", "b", "c", "d"].iter().enumerate() {
    s.record_task(new_task(account.account_id, subject, i as i64))
      .await
      .unwrap();
  }

  let rows = s.recent_tasks(account.account_id, 3).await.unwrap();
  let subjects: Vec<_> = rows.iter().map(|r| r.subject.as_deref().unwrap()).collect();
  assert_eq!(subjects, ["d", "c", "b"]);
  assert!(rows.iter().all(|r| r.related_to_name.as_deref() == Some("Acme Corp")));
}

#[tokio::test]
async fn reads_are_scoped_to_the_account() {
  let s = store().await;
  let acme = s.add_account("Acme Corp".into()).await.unwrap();
  let globex = s.add_account("Globex".into()).await.unwrap();
  s.record_event(new_event(acme.account_id, "kickoff", 0)).await.unwrap();
  s.record_event(new_event(globex.account_id, "demo", 1)).await.unwrap();

  let rows = s.recent_events(acme.account_id, 10).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].subject.as_deref(), Some("kickoff"));
}

#[tokio::test]
async fn unknown_account_yields_empty_selection() {
  let s = store().await;
  let rows = select_recent(&s, Uuid::new_v4(), NonZeroUsize::new(10).unwrap())
    .await
    .unwrap();
  assert!(rows.is_empty());
}

#[tokio::test]
async fn selector_and_normalizer_end_to_end() {
  let s = store().await;
  let account = s.add_account("Acme Corp".into()).await.unwrap();
  let id = account.account_id;

  s.record_task(new_task(id, "t1", 10)).await.unwrap();
  s.record_task(new_task(id, "t2", 30)).await.unwrap();
  s.record_task(new_task(id, "t3", 50)).await.unwrap();
  s.record_event(new_event(id, "e1", 20)).await.unwrap();
  s.record_event(new_event(id, "e2", 40)).await.unwrap();

  let rows = select_recent(&s, id, NonZeroUsize::new(10).unwrap()).await.unwrap();
  assert_eq!((rows.tasks.len(), rows.events.len(), rows.emails.len()), (3, 2, 0));

  let records = normalize(rows);
  assert_eq!(records.len(), 5);
  let subjects: Vec<_> = records.iter().map(|r| r.subject.as_deref().unwrap()).collect();
  assert_eq!(subjects, ["t3", "e2", "t2", "e1", "t1"]);
  for r in &records {
    let expected = if r.kind == ActivityKind::Task { "In Progress" } else { "Completed" };
    assert_eq!(r.status, expected);
    assert_eq!(r.related_to_name, "Acme Corp");
  }
}

#[tokio::test]
async fn limit_applies_per_kind() {
  let s = store().await;
  let account = s.add_account("Acme Corp".into()).await.unwrap();
  let id = account.account_id;
  for i in 0..5 {
    s.record_task(new_task(id, "t", i)).await.unwrap();
    s.record_email(new_email(id, "m", i)).await.unwrap();
  }

  let rows = select_recent(&s, id, NonZeroUsize::new(2).unwrap()).await.unwrap();
  assert_eq!(rows.tasks.len(), 2);
  assert_eq!(rows.emails.len(), 2);
  assert_eq!(rows.len(), 4);
}

// ─── Files ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn store_and_duplicate_file() {
  let s = store().await;
  let original = s
    .store_file(NewFile::from_file_name("scan.png", "image/png", b"png-bytes".to_vec()))
    .await
    .unwrap();
  assert_eq!(original.size, 9);
  assert_eq!(original.file_name(), "scan.png");

  let fetched = s.get_file_version(original.file_version_id).await.unwrap().unwrap();
  assert_eq!(&fetched.content[..], b"png-bytes");
  assert_eq!(fetched.content_hash, original.content_hash);

  let copy = s
    .duplicate_file_version(original.file_version_id, "Acme - 2024-01-01".into())
    .await
    .unwrap();
  assert_ne!(copy.file_version_id, original.file_version_id);
  assert_eq!(copy.document_id, original.document_id);
  assert_eq!(copy.file_name(), "Acme - 2024-01-01.png");

  // The original version is untouched.
  let still = s.get_file_version(original.file_version_id).await.unwrap().unwrap();
  assert_eq!(still.title, "scan");
}

#[tokio::test]
async fn duplicating_missing_file_fails() {
  let s = store().await;
  let err = s
    .duplicate_file_version(Uuid::new_v4(), "x".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::FileVersionNotFound(_)));
}

// ─── Expenses ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_list_expenses() {
  let s = store().await;
  let account = s.add_account("Acme Corp".into()).await.unwrap();
  let fields = ExtractedExpense {
    vendor_name:    "Blue Bottle".into(),
    price:          "4.50".into(),
    expense_date:   "2024-02-29".into(),
    expense_detail: "Latte".into(),
  };
  let new = NewExpense::from_extracted(&fields, Some(account.account_id), None).unwrap();

  let item = s.insert_expense(new).await.unwrap();
  assert_eq!(item.price_display(), "4.50");

  let all = s.list_expenses(None).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].expense_id, item.expense_id);
  assert_eq!(all[0].expense_date, item.expense_date);

  let other = s.list_expenses(Some(Uuid::new_v4())).await.unwrap();
  assert!(other.is_empty());
}

#[tokio::test]
async fn recorded_row_matches_what_is_read_back() {
  let s = store().await;
  let account = s.add_account("Acme Corp".into()).await.unwrap();
  let mut input = new_task(account.account_id, "precise", 0);
  input.created_at = Some(at(0) + Duration::nanoseconds(123_456_789));

  let written = s.record_task(input).await.unwrap();
  let read = s.recent_tasks(account.account_id, 1).await.unwrap();
  assert_eq!(read[0].created_at, written.created_at);
  assert_eq!(written.created_at, at(0) + Duration::microseconds(123_456));

  let fetched = s.get_account(account.account_id).await.unwrap().unwrap();
  assert_eq!(fetched.created_at, account.created_at);
}
