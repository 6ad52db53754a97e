//! Group: a released set of cards, identified upstream by a numeric id and
//! a human-readable abbreviation (e.g. `OP-01`, `EB-03`).

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A locally mirrored group row. Written only by the sync routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub group_id:     i64,
  pub name:         String,
  /// Lookup key; always compared case-insensitively.
  pub abbreviation: String,
  /// When the group was last pulled from upstream. `None` if never.
  pub synced_at:    Option<DateTime<Utc>>,
}

impl Group {
  /// Whether the group was synced less than `ttl` before `now`.
  pub fn is_fresh(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
    self.synced_at.is_some_and(|at| now - at < ttl)
  }
}

/// Case-insensitive abbreviation comparison used for every group lookup.
pub fn abbreviation_matches(candidate: &str, wanted: &str) -> bool {
  candidate.to_lowercase() == wanted.to_lowercase()
}
