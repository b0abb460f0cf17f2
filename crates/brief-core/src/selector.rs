//! Record selector: the three bounded, newest-first reads for one account.

use std::num::NonZeroUsize;

use uuid::Uuid;

use crate::{activity::ActivityRows, store::ActivityStore};

/// Rows fetched per activity kind when the caller does not say otherwise.
pub const DEFAULT_ACTIVITY_LIMIT: NonZeroUsize = match NonZeroUsize::new(10) {
  Some(n) => n,
  None => unreachable!(),
};

/// Fetch up to `limit` tasks, events, and emails for `account_id`.
///
/// The reads run one after another; an account without activity yields an
/// empty [`ActivityRows`].
pub async fn select_recent<S: ActivityStore>(
  store: &S,
  account_id: Uuid,
  limit: NonZeroUsize,
) -> Result<ActivityRows, S::Error> {
  let limit = limit.get();
  let tasks = store.recent_tasks(account_id, limit).await?;
  let events = store.recent_events(account_id, limit).await?;
  let emails = store.recent_emails(account_id, limit).await?;
  Ok(ActivityRows { tasks, events, emails })
}
