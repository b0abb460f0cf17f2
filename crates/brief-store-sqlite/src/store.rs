//! [`SqliteStore`]: the SQLite implementation of [`ActivityStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use brief_core::{
  account::Account,
  activity::{EmailRow, EventRow, NewEmail, NewEvent, NewTask, TaskRow},
  expense::{ExpenseLineItem, NewExpense},
  file::{FileVersion, NewFile},
  store::ActivityStore,
};

use crate::{
  encode::{
    RawAccount, RawEmail, RawEvent, RawExpense, RawFileVersion, RawTask,
    content_hash, encode_date, encode_dt, encode_uuid, truncate_dt,
  },
  schema::SCHEMA,
  Error, Result,
};

const FILE_VERSION_COLUMNS: &str = "file_version_id, document_id, title, file_extension,
  mime_type, content, content_hash, created_at";

const EXPENSE_COLUMNS: &str = "expense_id, vendor_name, price_cents, expense_date, detail,
  account_id, file_version_id, created_at";

fn raw_file_version(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFileVersion> {
  Ok(RawFileVersion {
    file_version_id: row.get(0)?,
    document_id:     row.get(1)?,
    title:           row.get(2)?,
    file_extension:  row.get(3)?,
    mime_type:       row.get(4)?,
    content:         row.get(5)?,
    content_hash:    row.get(6)?,
    created_at:      row.get(7)?,
  })
}

fn raw_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawExpense> {
  Ok(RawExpense {
    expense_id:      row.get(0)?,
    vendor_name:     row.get(1)?,
    price_cents:     row.get(2)?,
    expense_date:    row.get(3)?,
    detail:          row.get(4)?,
    account_id:      row.get(5)?,
    file_version_id: row.get(6)?,
    created_at:      row.get(7)?,
  })
}

/// Current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> { truncate_dt(Utc::now()) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// An activity store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Look up the owning account for an activity write.
  async fn require_account(&self, id: Uuid) -> Result<Account> {
    self.get_account(id).await?.ok_or(Error::AccountNotFound(id))
  }

  async fn insert_file_version(&self, version: &FileVersion) -> Result<()> {
    let id_str      = encode_uuid(version.file_version_id);
    let doc_str     = encode_uuid(version.document_id);
    let title       = version.title.clone();
    let extension   = version.file_extension.clone();
    let mime_type   = version.mime_type.clone();
    let content     = version.content.to_vec();
    let hash        = version.content_hash.clone();
    let at_str      = encode_dt(version.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO file_versions ({FILE_VERSION_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
          ),
          rusqlite::params![
            id_str, doc_str, title, extension, mime_type, content, hash, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ActivityStore impl ──────────────────────────────────────────────────────

impl ActivityStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn add_account(&self, name: String) -> Result<Account> {
    let account = Account {
      account_id: Uuid::new_v4(),
      name,
      created_at: now(),
    };

    let id_str   = encode_uuid(account.account_id);
    let name_str = account.name.clone();
    let at_str   = encode_dt(account.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (account_id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(account)
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT account_id, name, created_at FROM accounts WHERE account_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawAccount {
                account_id: row.get(0)?,
                name:       row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  // ── Activity writes ───────────────────────────────────────────────────────

  async fn record_task(&self, input: NewTask) -> Result<TaskRow> {
    let account = self.require_account(input.account_id).await?;
    let row = TaskRow {
      task_id:         Uuid::new_v4(),
      account_id:      account.account_id,
      related_to_name: Some(account.name),
      subject:         input.subject,
      description:     input.description,
      status:          input.status,
      created_at:      truncate_dt(input.created_at.unwrap_or_else(Utc::now)),
    };

    let id_str      = encode_uuid(row.task_id);
    let account_str = encode_uuid(row.account_id);
    let subject     = row.subject.clone();
    let description = row.description.clone();
    let status      = row.status.clone();
    let at_str      = encode_dt(row.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tasks (task_id, account_id, subject, description, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, account_str, subject, description, status, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(row)
  }

  async fn record_event(&self, input: NewEvent) -> Result<EventRow> {
    let account = self.require_account(input.account_id).await?;
    let row = EventRow {
      event_id:        Uuid::new_v4(),
      account_id:      account.account_id,
      related_to_name: Some(account.name),
      subject:         input.subject,
      description:     input.description,
      created_at:      truncate_dt(input.created_at.unwrap_or_else(Utc::now)),
    };

    let id_str      = encode_uuid(row.event_id);
    let account_str = encode_uuid(row.account_id);
    let subject     = row.subject.clone();
    let description = row.description.clone();
    let at_str      = encode_dt(row.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (event_id, account_id, subject, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, account_str, subject, description, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(row)
  }

  async fn record_email(&self, input: NewEmail) -> Result<EmailRow> {
    let account = self.require_account(input.account_id).await?;
    let row = EmailRow {
      email_id:        Uuid::new_v4(),
      account_id:      account.account_id,
      related_to_name: Some(account.name),
      subject:         input.subject,
      text_body:       input.text_body,
      created_at:      truncate_dt(input.created_at.unwrap_or_else(Utc::now)),
    };

    let id_str      = encode_uuid(row.email_id);
    let account_str = encode_uuid(row.account_id);
    let subject     = row.subject.clone();
    let text_body   = row.text_body.clone();
    let at_str      = encode_dt(row.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO emails (email_id, account_id, subject, text_body, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, account_str, subject, text_body, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(row)
  }

  // ── Activity reads ────────────────────────────────────────────────────────

  async fn recent_tasks(&self, account_id: Uuid, limit: usize) -> Result<Vec<TaskRow>> {
    let account_str = encode_uuid(account_id);
    let limit_val   = limit as i64;

    let raws: Vec<RawTask> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT t.task_id, t.account_id, a.name, t.subject, t.description,
                  t.status, t.created_at
           FROM tasks t
           LEFT JOIN accounts a ON a.account_id = t.account_id
           WHERE t.account_id = ?1
           ORDER BY t.created_at DESC, t.rowid DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![account_str, limit_val], |row| {
            Ok(RawTask {
              task_id:         row.get(0)?,
              account_id:      row.get(1)?,
              related_to_name: row.get(2)?,
              subject:         row.get(3)?,
              description:     row.get(4)?,
              status:          row.get(5)?,
              created_at:      row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(%account_id, count = raws.len(), "selected tasks");
    raws.into_iter().map(RawTask::into_row).collect()
  }

  async fn recent_events(&self, account_id: Uuid, limit: usize) -> Result<Vec<EventRow>> {
    let account_str = encode_uuid(account_id);
    let limit_val   = limit as i64;

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT e.event_id, e.account_id, a.name, e.subject, e.description,
                  e.created_at
           FROM events e
           LEFT JOIN accounts a ON a.account_id = e.account_id
           WHERE e.account_id = ?1
           ORDER BY e.created_at DESC, e.rowid DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![account_str, limit_val], |row| {
            Ok(RawEvent {
              event_id:        row.get(0)?,
              account_id:      row.get(1)?,
              related_to_name: row.get(2)?,
              subject:         row.get(3)?,
              description:     row.get(4)?,
              created_at:      row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(%account_id, count = raws.len(), "selected events");
    raws.into_iter().map(RawEvent::into_row).collect()
  }

  async fn recent_emails(&self, account_id: Uuid, limit: usize) -> Result<Vec<EmailRow>> {
    let account_str = encode_uuid(account_id);
    let limit_val   = limit as i64;

    let raws: Vec<RawEmail> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT m.email_id, m.account_id, a.name, m.subject, m.text_body,
                  m.created_at
           FROM emails m
           LEFT JOIN accounts a ON a.account_id = m.account_id
           WHERE m.account_id = ?1
           ORDER BY m.created_at DESC, m.rowid DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![account_str, limit_val], |row| {
            Ok(RawEmail {
              email_id:        row.get(0)?,
              account_id:      row.get(1)?,
              related_to_name: row.get(2)?,
              subject:         row.get(3)?,
              text_body:       row.get(4)?,
              created_at:      row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(%account_id, count = raws.len(), "selected emails");
    raws.into_iter().map(RawEmail::into_row).collect()
  }

  // ── Files ─────────────────────────────────────────────────────────────────

  async fn store_file(&self, input: NewFile) -> Result<FileVersion> {
    let version = FileVersion {
      file_version_id: Uuid::new_v4(),
      document_id:     Uuid::new_v4(),
      title:           input.title,
      file_extension:  input.file_extension,
      mime_type:       input.mime_type,
      content_hash:    content_hash(&input.content),
      size:            input.content.len() as u64,
      created_at:      now(),
      content:         input.content,
    };

    self.insert_file_version(&version).await?;
    Ok(version)
  }

  async fn get_file_version(&self, id: Uuid) -> Result<Option<FileVersion>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFileVersion> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {FILE_VERSION_COLUMNS} FROM file_versions WHERE file_version_id = ?1"
            ),
            rusqlite::params![id_str],
            raw_file_version,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawFileVersion::into_file_version).transpose()
  }

  async fn duplicate_file_version(&self, id: Uuid, title: String) -> Result<FileVersion> {
    let original = self
      .get_file_version(id)
      .await?
      .ok_or(Error::FileVersionNotFound(id))?;

    let copy = FileVersion {
      file_version_id: Uuid::new_v4(),
      title,
      created_at: now(),
      ..original
    };

    self.insert_file_version(&copy).await?;
    Ok(copy)
  }

  // ── Expenses ──────────────────────────────────────────────────────────────

  async fn insert_expense(&self, input: NewExpense) -> Result<ExpenseLineItem> {
    let item = ExpenseLineItem {
      expense_id:      Uuid::new_v4(),
      vendor_name:     input.vendor_name,
      price_cents:     input.price_cents,
      expense_date:    input.expense_date,
      detail:          input.detail,
      account_id:      input.account_id,
      file_version_id: input.file_version_id,
      created_at:      now(),
    };

    let id_str      = encode_uuid(item.expense_id);
    let vendor      = item.vendor_name.clone();
    let price       = item.price_cents;
    let date_str    = encode_date(item.expense_date);
    let detail      = item.detail.clone();
    let account_str = item.account_id.map(encode_uuid);
    let file_str    = item.file_version_id.map(encode_uuid);
    let at_str      = encode_dt(item.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO expense_line_items ({EXPENSE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
          ),
          rusqlite::params![
            id_str, vendor, price, date_str, detail, account_str, file_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(item)
  }

  async fn list_expenses(&self, account_id: Option<Uuid>) -> Result<Vec<ExpenseLineItem>> {
    let account_str = account_id.map(encode_uuid);

    let raws: Vec<RawExpense> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(a) = account_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense_line_items
             WHERE account_id = ?1
             ORDER BY created_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![a], raw_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense_line_items
             ORDER BY created_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map([], raw_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExpense::into_line_item).collect()
  }
}
