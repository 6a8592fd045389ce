//! HTTP Basic-auth extractor checked against the stored admin credentials.

use std::sync::Arc;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use folio_core::store::DocumentStore;

use crate::error::ApiError;

/// Present in a handler's arguments means the request carried the admin's
/// email and password. Holds the authenticated email.
#[derive(Debug)]
pub struct AdminAuth(pub String);

/// Pull `(email, password)` out of a Basic `Authorization` header.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let encoded = value.strip_prefix("Basic ")?;
  let decoded = B64.decode(encoded).ok()?;
  let pair = String::from_utf8(decoded).ok()?;
  let (email, password) = pair.split_once(':')?;
  Some((email.to_owned(), password.to_owned()))
}

impl<S> FromRequestParts<Arc<S>> for AdminAuth
where
  S: DocumentStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, store: &Arc<S>) -> Result<Self, Self::Rejection> {
    let (email, password) = basic_credentials(&parts.headers)
      .ok_or_else(|| ApiError::Unauthorized("Authentication required.".into()))?;
    let email = folio_sync::session::authenticate(&**store, &email, &password).await?;
    Ok(AdminAuth(email))
  }
}
