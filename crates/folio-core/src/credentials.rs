//! Admin credential hashing and verification.
//!
//! Passwords are stored as argon2 PHC strings in the `admin/credentials`
//! document and checked server-side; plaintext never leaves the login path.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result, resource::AdminCredentials};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Produce an argon2 PHC string for `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

impl AdminCredentials {
  pub fn new(email: impl Into<String>, password: &str) -> Result<Self> {
    Ok(Self { email: email.into(), password_hash: hash_password(password)? })
  }

  /// `true` if the pair matches. An unparsable stored hash never matches.
  pub fn verify(&self, email: &str, password: &str) -> bool {
    if self.email.is_empty() || email != self.email {
      return false;
    }
    let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  }
}

/// Validate a password change request against the current credentials.
pub fn check_password_change(
  current: &AdminCredentials,
  old_password: &str,
  new_password: &str,
  confirmation: &str,
) -> Result<()> {
  if !current.verify(&current.email, old_password) {
    return Err(Error::Validation("old password is incorrect".into()));
  }
  if new_password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::Validation(format!(
      "new password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  if new_password != confirmation {
    return Err(Error::Validation("passwords do not match".into()));
  }
  Ok(())
}
