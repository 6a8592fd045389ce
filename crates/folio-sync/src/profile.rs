//! Admin profile and password management.

use folio_core::{
  credentials::check_password_change,
  document::merge_shallow,
  resource::{AdminCredentials, AdminProfile, Resource, Singleton},
  store::DocumentStore,
};

use crate::{
  Error, Result,
  editor::DocumentEditor,
  error::store_err,
  notify::Notifier,
  session::load_credentials,
};

pub type ProfileEditor<S> = DocumentEditor<S, AdminProfile>;

/// Replace the admin credentials outright.
pub async fn set_credentials<S: DocumentStore>(store: &S, email: &str, password: &str) -> Result<()> {
  let creds = AdminCredentials::new(email, password)?;
  write_credentials(store, &creds).await
}

/// Change the admin password after checking the old one. The outcome is
/// reported through `notifier` either way.
pub async fn change_password<S: DocumentStore>(
  store: &S,
  notifier: &dyn Notifier,
  old_password: &str,
  new_password: &str,
  confirmation: &str,
) -> Result<()> {
  let result = rehash(store, old_password, new_password, confirmation).await;

  match &result {
    Ok(()) => notifier.success("Password changed successfully."),
    Err(Error::Core(folio_core::Error::Validation(msg))) => notifier.error(&capitalize(msg)),
    Err(e) => {
      tracing::error!(error = %e, "password change failed");
      notifier.error("Failed to change password");
    }
  }
  result
}

async fn rehash<S: DocumentStore>(
  store: &S,
  old_password: &str,
  new_password: &str,
  confirmation: &str,
) -> Result<()> {
  let current = load_credentials(store).await?.ok_or(Error::CredentialsMissing)?;
  check_password_change(&current, old_password, new_password, confirmation)?;
  let updated = AdminCredentials::new(current.email, new_password)?;
  write_credentials(store, &updated).await
}

async fn write_credentials<S: DocumentStore>(store: &S, creds: &AdminCredentials) -> Result<()> {
  let current = store
    .get(AdminCredentials::COLLECTION, AdminCredentials::DOC_ID)
    .await
    .map_err(store_err)?
    .map(|d| d.fields)
    .unwrap_or_default();
  let merged = merge_shallow(current, creds.to_fields()?);
  store
    .set(AdminCredentials::COLLECTION, AdminCredentials::DOC_ID, merged)
    .await
    .map_err(store_err)?;
  Ok(())
}

fn capitalize(msg: &str) -> String {
  let mut chars = msg.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    notify::Level,
    session::authenticate,
    testing::{notifier, store},
  };

  #[tokio::test]
  async fn password_change_rehashes() {
    let s = store().await;
    let n = notifier();
    set_credentials(&*s, "admin@example.com", "old-pass").await.unwrap();

    change_password(&*s, &*n, "old-pass", "new-pass", "new-pass").await.unwrap();
    assert_eq!(n.last().unwrap().level, Level::Success);
    assert!(authenticate(&*s, "admin@example.com", "new-pass").await.is_ok());
    assert!(authenticate(&*s, "admin@example.com", "old-pass").await.is_err());

    let doc = s.get("admin", "credentials").await.unwrap().unwrap();
    assert_ne!(doc.fields["passwordHash"], "new-pass");
  }

  #[tokio::test]
  async fn wrong_old_password_changes_nothing() {
    let s = store().await;
    let n = notifier();
    set_credentials(&*s, "admin@example.com", "old-pass").await.unwrap();

    assert!(change_password(&*s, &*n, "nope", "new-pass", "new-pass").await.is_err());
    assert_eq!(n.last().unwrap().message, "Old password is incorrect");
    assert!(authenticate(&*s, "admin@example.com", "old-pass").await.is_ok());
  }

  #[tokio::test]
  async fn short_or_mismatched_passwords_are_rejected() {
    let s = store().await;
    let n = notifier();
    set_credentials(&*s, "admin@example.com", "old-pass").await.unwrap();

    assert!(change_password(&*s, &*n, "old-pass", "abc", "abc").await.is_err());
    assert!(change_password(&*s, &*n, "old-pass", "abcdef", "abcdeg").await.is_err());
    assert_eq!(n.count(Level::Error), 2);
  }

  #[tokio::test]
  async fn profile_fields_live_beside_credentials() {
    let s = store().await;
    set_credentials(&*s, "admin@example.com", "old-pass").await.unwrap();

    let mut ed = ProfileEditor::new(s.clone(), notifier());
    ed.load().await;
    ed.edit().unwrap();
    ed.update(|p| {
      p.name = "Admin".into();
      p.email = "admin@example.com".into();
    })
    .unwrap();
    ed.save().await.unwrap();

    assert!(s.get("admin", "profile").await.unwrap().is_some());
    assert!(authenticate(&*s, "admin@example.com", "old-pass").await.is_ok());
  }
}
