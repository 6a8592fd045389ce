//! Presence classification over heartbeat documents.
//!
//! A visitor is active if their heartbeat is younger than [`ACTIVE_WINDOW_SECS`].
//! Classification is recomputed on every read; heartbeats never expire.

use chrono::{DateTime, TimeDelta, Utc};

use crate::resource::{ActiveUser, Record};

pub const ACTIVE_WINDOW_SECS: i64 = 5 * 60;

pub fn active_window() -> TimeDelta { TimeDelta::seconds(ACTIVE_WINDOW_SECS) }

/// `true` if `last_seen` falls strictly within the window ending at `now`.
pub fn is_active(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
  now.signed_duration_since(last_seen) < active_window()
}

impl ActiveUser {
  /// A heartbeat without a timestamp is never active.
  pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
    self.last_seen.is_some_and(|seen| is_active(seen, now))
  }
}

pub fn count_active(heartbeats: &[Record<ActiveUser>], now: DateTime<Utc>) -> usize {
  heartbeats.iter().filter(|h| h.value.is_active_at(now)).count()
}
