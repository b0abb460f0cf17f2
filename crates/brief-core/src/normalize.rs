//! Activity normalizer: raw rows → [`ActivityRecord`]s, newest first.

use crate::activity::{ActivityRecord, ActivityRows};

/// Map every row into the common shape and sort by `occurred_at` descending.
///
/// Rows are concatenated tasks, events, emails (each in selector order) and
/// then stable-sorted, so equal timestamps keep that concatenation order.
pub fn normalize(rows: ActivityRows) -> Vec<ActivityRecord> {
  let ActivityRows { tasks, events, emails } = rows;

  let mut records: Vec<ActivityRecord> =
    Vec::with_capacity(tasks.len() + events.len() + emails.len());
  records.extend(tasks.into_iter().map(ActivityRecord::from));
  records.extend(events.into_iter().map(ActivityRecord::from));
  records.extend(emails.into_iter().map(ActivityRecord::from));

  sort_newest_first(&mut records);
  records
}

/// Stable descending sort on `occurred_at`.
pub fn sort_newest_first(records: &mut [ActivityRecord]) {
  records.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
}
