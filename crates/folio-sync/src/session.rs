//! Admin sign-in state.

use chrono::{DateTime, Utc};
use folio_core::{
  resource::{AdminCredentials, Resource, Singleton},
  store::DocumentStore,
};

use crate::{Error, Result, error::store_err};

/// Who is signed in to the admin panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
  #[default]
  LoggedOut,
  LoggedIn {
    email: String,
    since: DateTime<Utc>,
  },
}

impl Session {
  pub fn is_logged_in(&self) -> bool { matches!(self, Self::LoggedIn { .. }) }

  pub fn email(&self) -> Option<&str> {
    match self {
      Self::LoggedIn { email, .. } => Some(email),
      Self::LoggedOut => None,
    }
  }

  /// Check the pair against the stored credentials. The session is only
  /// changed on success.
  pub async fn login<S: DocumentStore>(&mut self, store: &S, email: &str, password: &str) -> Result<()> {
    let email = authenticate(store, email, password).await?;
    tracing::info!(email = %email, "admin signed in");
    *self = Self::LoggedIn { email, since: Utc::now() };
    Ok(())
  }

  pub fn logout(&mut self) {
    if let Self::LoggedIn { email, .. } = self {
      tracing::info!(email = %email, "admin signed out");
    }
    *self = Self::LoggedOut;
  }
}

pub async fn load_credentials<S: DocumentStore>(store: &S) -> Result<Option<AdminCredentials>> {
  let doc = store
    .get(AdminCredentials::COLLECTION, AdminCredentials::DOC_ID)
    .await
    .map_err(store_err)?;
  Ok(match doc {
    Some(doc) => Some(AdminCredentials::from_fields(&doc.fields)?),
    None => None,
  })
}

/// Verify `email`/`password`. Returns the signed-in email.
pub async fn authenticate<S: DocumentStore>(store: &S, email: &str, password: &str) -> Result<String> {
  let Some(creds) = load_credentials(store).await? else {
    tracing::warn!("login attempted before admin credentials were set");
    return Err(Error::CredentialsMissing);
  };
  if creds.verify(email, password) {
    Ok(creds.email)
  } else {
    Err(Error::InvalidCredentials)
  }
}
