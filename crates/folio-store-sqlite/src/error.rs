//! Error type for `folio-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] folio_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored document body was valid JSON but not an object.
  #[error("document {collection}/{id} is not a JSON object")]
  NotAnObject { collection: String, id: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
