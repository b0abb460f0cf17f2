//! Activity types: the raw rows returned by the record selector and the
//! common [`ActivityRecord`] shape they are normalized into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Status reported for every calendar event.
pub const EVENT_STATUS: &str = "Completed";

/// Status reported for every email.
pub const EMAIL_STATUS: &str = "Sent";

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The source record kind of an activity.
///
/// Displays as `Task` / `Event` / `Email` (used in prompts); serializes in
/// lowercase on the wire.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
  Task,
  Event,
  Email,
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A task as stored, joined with its account's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRow {
  pub task_id:         Uuid,
  pub account_id:      Uuid,
  pub related_to_name: Option<String>,
  pub subject:         Option<String>,
  pub description:     Option<String>,
  /// Free-form status, e.g. "Not Started", "Completed".
  pub status:          String,
  pub created_at:      DateTime<Utc>,
}

/// A calendar event as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
  pub event_id:        Uuid,
  pub account_id:      Uuid,
  pub related_to_name: Option<String>,
  pub subject:         Option<String>,
  pub description:     Option<String>,
  pub created_at:      DateTime<Utc>,
}

/// An email message as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRow {
  pub email_id:        Uuid,
  pub account_id:      Uuid,
  pub related_to_name: Option<String>,
  pub subject:         Option<String>,
  pub text_body:       Option<String>,
  pub created_at:      DateTime<Utc>,
}

/// One selector result: up to `limit` rows of each kind, newest first.
#[derive(Debug, Clone, Default)]
pub struct ActivityRows {
  pub tasks:  Vec<TaskRow>,
  pub events: Vec<EventRow>,
  pub emails: Vec<EmailRow>,
}

impl ActivityRows {
  pub fn len(&self) -> usize {
    self.tasks.len() + self.events.len() + self.emails.len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ActivityStore::record_task`].
///
/// `created_at` defaults to now; a caller importing historical activity may
/// supply it.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
  pub account_id:  Uuid,
  pub subject:     Option<String>,
  pub description: Option<String>,
  pub status:      String,
  #[serde(default)]
  pub created_at:  Option<DateTime<Utc>>,
}

/// Input to [`crate::store::ActivityStore::record_event`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
  pub account_id:  Uuid,
  pub subject:     Option<String>,
  pub description: Option<String>,
  #[serde(default)]
  pub created_at:  Option<DateTime<Utc>>,
}

/// Input to [`crate::store::ActivityStore::record_email`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmail {
  pub account_id: Uuid,
  pub subject:    Option<String>,
  pub text_body:  Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

// ─── Normalized record ───────────────────────────────────────────────────────

/// The common shape every task, event, and email is mapped into.
/// Built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
  pub kind:            ActivityKind,
  pub subject:         Option<String>,
  pub body:            Option<String>,
  pub status:          String,
  pub occurred_at:     DateTime<Utc>,
  pub related_to_name: String,
}

impl ActivityRecord {
  /// The body, if it contains anything besides whitespace.
  pub fn non_blank_body(&self) -> Option<&str> {
    self.body.as_deref().map(str::trim).filter(|b| !b.is_empty())
  }
}

impl From<TaskRow> for ActivityRecord {
  fn from(row: TaskRow) -> Self {
    Self {
      kind:            ActivityKind::Task,
      subject:         row.subject,
      body:            row.description,
      status:          row.status,
      occurred_at:     row.created_at,
      related_to_name: row.related_to_name.unwrap_or_default(),
    }
  }
}

impl From<EventRow> for ActivityRecord {
  fn from(row: EventRow) -> Self {
    Self {
      kind:            ActivityKind::Event,
      subject:         row.subject,
      body:            row.description,
      status:          EVENT_STATUS.to_owned(),
      occurred_at:     row.created_at,
      related_to_name: row.related_to_name.unwrap_or_default(),
    }
  }
}

impl From<EmailRow> for ActivityRecord {
  fn from(row: EmailRow) -> Self {
    Self {
      kind:            ActivityKind::Email,
      subject:         row.subject,
      body:            row.text_body,
      status:          EMAIL_STATUS.to_owned(),
      occurred_at:     row.created_at,
      related_to_name: row.related_to_name.unwrap_or_default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn kind_displays_capitalised_and_serializes_lowercase() {
    assert_eq!(ActivityKind::Event.to_string(), "Event");
    assert_eq!(ActivityKind::from_str("Email").unwrap(), ActivityKind::Email);
    assert_eq!(
      serde_json::to_string(&ActivityKind::Task).unwrap(),
      "\"task\""
    );
  }

  #[test]
  fn blank_body_is_treated_as_absent() {
    let record = ActivityRecord {
      kind:            ActivityKind::Task,
      subject:         None,
      body:            Some("   \n".into()),
      status:          "Open".into(),
      occurred_at:     Utc::now(),
      related_to_name: String::new(),
    };
    assert_eq!(record.non_blank_body(), None);
  }
}
