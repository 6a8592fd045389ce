//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-precision RFC 3339 strings so they compare
//! correctly as text. Document bodies are stored as compact JSON objects.

use chrono::{DateTime, Utc};
use folio_core::document::{Document, Fields, encode_timestamp};
use serde_json::Value;

use crate::{Error, Result};

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { encode_timestamp(dt) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Fields ───────────────────────────────────────────────────────────────────

pub fn encode_fields(fields: &Fields) -> Result<String> {
  Ok(serde_json::to_string(fields)?)
}

/// JSON path for a top-level field, quoted so any key is addressable.
pub fn field_path(field: &str) -> String {
  format!("$.\"{}\"", field.replace('"', "\\\""))
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// A `documents` row as read from SQLite, before decoding.
pub struct RawDocument {
  pub collection:  String,
  pub doc_id:      String,
  pub fields_json: String,
  pub updated_at:  String,
}

impl RawDocument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      collection:  row.get(0)?,
      doc_id:      row.get(1)?,
      fields_json: row.get(2)?,
      updated_at:  row.get(3)?,
    })
  }

  pub fn into_document(self) -> Result<Document> {
    let fields = match serde_json::from_str(&self.fields_json)? {
      Value::Object(map) => map,
      _ => {
        return Err(Error::NotAnObject {
          collection: self.collection,
          id:         self.doc_id,
        });
      }
    };
    Ok(Document {
      updated_at: decode_dt(&self.updated_at)?,
      collection: self.collection,
      id:         self.doc_id,
      fields,
    })
  }
}
