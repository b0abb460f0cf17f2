//! Account: the owning record that tasks, events, and emails relate to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub account_id: Uuid,
  /// Display name; copied onto every normalized activity as
  /// `related_to_name`.
  pub name:       String,
  pub created_at: DateTime<Utc>,
}
