//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings (microsecond precision, `Z`
//! suffix) so `ORDER BY created_at` sorts chronologically. Dates are
//! `YYYY-MM-DD`. UUIDs are hyphenated lowercase strings.

use brief_core::{
  account::Account,
  activity::{EmailRow, EventRow, TaskRow},
  expense::{EXPENSE_DATE_FORMAT, ExpenseLineItem},
  file::FileVersion,
};
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── DateTime<Utc> / NaiveDate ────────────────────────────────────────────────

/// Drop sub-microsecond digits so a returned row equals its stored form.
pub fn truncate_dt(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String {
  d.format(EXPENSE_DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, EXPENSE_DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Content hash ─────────────────────────────────────────────────────────────

/// Lowercase hex SHA-256 digest of `content`.
pub fn content_hash(content: &[u8]) -> String {
  hex::encode(Sha256::digest(content))
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// Column values for an `accounts` row before decoding.
pub struct RawAccount {
  pub account_id: String,
  pub name:       String,
  pub created_at: String,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id: decode_uuid(&self.account_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A `tasks` row joined with the account name.
pub struct RawTask {
  pub task_id:         String,
  pub account_id:      String,
  pub related_to_name: Option<String>,
  pub subject:         Option<String>,
  pub description:     Option<String>,
  pub status:          String,
  pub created_at:      String,
}

impl RawTask {
  pub fn into_row(self) -> Result<TaskRow> {
    Ok(TaskRow {
      task_id:         decode_uuid(&self.task_id)?,
      account_id:      decode_uuid(&self.account_id)?,
      related_to_name: self.related_to_name,
      subject:         self.subject,
      description:     self.description,
      status:          self.status,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawEvent {
  pub event_id:        String,
  pub account_id:      String,
  pub related_to_name: Option<String>,
  pub subject:         Option<String>,
  pub description:     Option<String>,
  pub created_at:      String,
}

impl RawEvent {
  pub fn into_row(self) -> Result<EventRow> {
    Ok(EventRow {
      event_id:        decode_uuid(&self.event_id)?,
      account_id:      decode_uuid(&self.account_id)?,
      related_to_name: self.related_to_name,
      subject:         self.subject,
      description:     self.description,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawEmail {
  pub email_id:        String,
  pub account_id:      String,
  pub related_to_name: Option<String>,
  pub subject:         Option<String>,
  pub text_body:       Option<String>,
  pub created_at:      String,
}

impl RawEmail {
  pub fn into_row(self) -> Result<EmailRow> {
    Ok(EmailRow {
      email_id:        decode_uuid(&self.email_id)?,
      account_id:      decode_uuid(&self.account_id)?,
      related_to_name: self.related_to_name,
      subject:         self.subject,
      text_body:       self.text_body,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawFileVersion {
  pub file_version_id: String,
  pub document_id:     String,
  pub title:           String,
  pub file_extension:  Option<String>,
  pub mime_type:       String,
  pub content:         Vec<u8>,
  pub content_hash:    String,
  pub created_at:      String,
}

impl RawFileVersion {
  pub fn into_file_version(self) -> Result<FileVersion> {
    Ok(FileVersion {
      file_version_id: decode_uuid(&self.file_version_id)?,
      document_id:     decode_uuid(&self.document_id)?,
      title:           self.title,
      file_extension:  self.file_extension,
      mime_type:       self.mime_type,
      content_hash:    self.content_hash,
      size:            self.content.len() as u64,
      created_at:      decode_dt(&self.created_at)?,
      content:         Bytes::from(self.content),
    })
  }
}

pub struct RawExpense {
  pub expense_id:      String,
  pub vendor_name:     String,
  pub price_cents:     i64,
  pub expense_date:    String,
  pub detail:          String,
  pub account_id:      Option<String>,
  pub file_version_id: Option<String>,
  pub created_at:      String,
}

impl RawExpense {
  pub fn into_line_item(self) -> Result<ExpenseLineItem> {
    Ok(ExpenseLineItem {
      expense_id:      decode_uuid(&self.expense_id)?,
      vendor_name:     self.vendor_name,
      price_cents:     self.price_cents,
      expense_date:    decode_date(&self.expense_date)?,
      detail:          self.detail,
      account_id:      decode_opt_uuid(self.account_id)?,
      file_version_id: decode_opt_uuid(self.file_version_id)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
