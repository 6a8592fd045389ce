//! Server start-up errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("admin_password_hash is not an argon2 PHC string: {0}")]
  InvalidHash(String),

  #[error(transparent)]
  Core(#[from] folio_core::Error),

  #[error(transparent)]
  Sync(#[from] folio_sync::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}
