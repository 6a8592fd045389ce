//! Documents: schemaless JSON objects addressed by collection and id.
//!
//! Documents are replaced wholesale on every write. Editors that must not
//! clobber fields they do not own read the current document first and
//! [`merge_shallow`] their fields on top before writing.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Collections ─────────────────────────────────────────────────────────────

/// Collection names used by the portfolio.
pub mod collections {
  pub const ABOUT: &str = "aboutSection";
  pub const PROJECTS: &str = "projects";
  pub const SKILLS: &str = "skills";
  pub const CERTIFICATES: &str = "certificates";
  pub const MESSAGES: &str = "messages";
  pub const CONTACTS: &str = "contacts";
  pub const ADMIN: &str = "admin";
  pub const ACTIVE_USERS: &str = "activeUsers";
  pub const USERS: &str = "users";
}

/// The top-level fields of a document.
pub type Fields = Map<String, Value>;

// ─── Document ────────────────────────────────────────────────────────────────

/// A stored document as returned by a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub collection: String,
  pub id:         String,
  pub fields:     Fields,
  /// Server-assigned time of the last write.
  pub updated_at: DateTime<Utc>,
}

// ─── Server timestamps ───────────────────────────────────────────────────────

const SERVER_TIMESTAMP_KEY: &str = "$serverTimestamp";

/// A sentinel value the store replaces with the write time.
pub fn server_timestamp() -> Value {
  let mut sentinel = Map::new();
  sentinel.insert(SERVER_TIMESTAMP_KEY.to_owned(), Value::Bool(true));
  Value::Object(sentinel)
}

pub fn is_server_timestamp(value: &Value) -> bool {
  value
    .as_object()
    .is_some_and(|o| o.len() == 1 && o.get(SERVER_TIMESTAMP_KEY) == Some(&Value::Bool(true)))
}

/// Replace every top-level server-timestamp sentinel in `fields` with `now`.
pub fn resolve_server_timestamps(fields: &mut Fields, now: DateTime<Utc>) {
  for value in fields.values_mut() {
    if is_server_timestamp(value) {
      *value = Value::String(encode_timestamp(now));
    }
  }
}

/// Encode a timestamp as fixed-precision RFC 3339 so that encoded values sort
/// in chronological order.
pub fn encode_timestamp(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_timestamp(value: &Value) -> Option<DateTime<Utc>> {
  value
    .as_str()
    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    .map(|dt| dt.with_timezone(&Utc))
}

// ─── Merging ─────────────────────────────────────────────────────────────────

/// Overlay `patch` on `base`, key by key. Keys absent from `patch` keep their
/// value from `base`.
pub fn merge_shallow(mut base: Fields, patch: Fields) -> Fields {
  for (key, value) in patch {
    base.insert(key, value);
  }
  base
}

/// Restrict `fields` to the given keys. Keys missing from `fields` are skipped.
pub fn project(fields: &Fields, keys: &[&str]) -> Fields {
  keys
    .iter()
    .filter_map(|k| fields.get(*k).map(|v| ((*k).to_owned(), v.clone())))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn fields(v: Value) -> Fields {
    match v {
      Value::Object(m) => m,
      _ => panic!("not an object"),
    }
  }

  #[test]
  fn merge_keeps_unpatched_keys() {
    let base = fields(json!({ "text": "old", "aboutImage": "a.png" }));
    let patch = fields(json!({ "text": "new" }));
    let merged = merge_shallow(base, patch);
    assert_eq!(merged["text"], "new");
    assert_eq!(merged["aboutImage"], "a.png");
  }

  #[test]
  fn merge_can_null_out_a_key() {
    let base = fields(json!({ "aboutImage": "a.png" }));
    let merged = merge_shallow(base, fields(json!({ "aboutImage": null })));
    assert_eq!(merged["aboutImage"], Value::Null);
  }

  #[test]
  fn project_skips_missing_keys() {
    let f = fields(json!({ "a": 1, "b": 2 }));
    let p = project(&f, &["a", "c"]);
    assert_eq!(p.len(), 1);
    assert_eq!(p["a"], 1);
  }

  #[test]
  fn server_timestamps_are_resolved() {
    let now = Utc::now();
    let mut f = fields(json!({ "name": "x", "lastSeen": server_timestamp() }));
    resolve_server_timestamps(&mut f, now);
    assert_eq!(decode_timestamp(&f["lastSeen"]).unwrap().timestamp_micros(), now.timestamp_micros());
    assert_eq!(f["name"], "x");
  }

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let a = DateTime::parse_from_rfc3339("2024-01-01T09:00:00Z").unwrap().with_timezone(&Utc);
    let b = DateTime::parse_from_rfc3339("2024-01-01T10:00:00.5Z").unwrap().with_timezone(&Utc);
    assert!(encode_timestamp(a) < encode_timestamp(b));
  }
}
