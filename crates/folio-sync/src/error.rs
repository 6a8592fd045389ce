//! Error type for `folio-sync`.
//!
//! By the time one of these reaches a caller it has already been logged and
//! surfaced through the editor's notifier.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("remote service error: {0}")]
  Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Core(#[from] folio_core::Error),

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("admin credentials are not set")]
  CredentialsMissing,

  #[error("cannot {action} while {state}")]
  InvalidState { action: &'static str, state: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

pub(crate) fn remote_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Remote(Box::new(e))
}
