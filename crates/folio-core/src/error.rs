//! Error types for `folio-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("document not found: {collection}/{id}")]
  DocumentNotFound { collection: String, id: String },

  #[error("validation failed: {0}")]
  Validation(String),

  #[error("password hash error: {0}")]
  PasswordHash(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
