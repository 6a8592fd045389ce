//! `POST /admin/login`

use std::sync::Arc;

use axum::{Json, extract::State};
use folio_core::store::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub success: bool,
  pub email:   String,
}

/// Body: `{"email": "...", "password": "..."}`. Refusals are 401s and never
/// say which half was wrong.
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: DocumentStore,
{
  let email = folio_sync::session::authenticate(&*store, body.email.trim(), &body.password)
    .await
    .inspect_err(|e| tracing::info!(error = %e, "admin login refused"))?;
  Ok(Json(LoginResponse { success: true, email }))
}
