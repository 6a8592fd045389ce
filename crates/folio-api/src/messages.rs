//! `POST /messages`: the public contact form.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use folio_core::store::DocumentStore;
use folio_sync::notify::TracingNotifier;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct MessageBody {
  #[serde(default)]
  pub name:    String,
  #[serde(default)]
  pub email:   String,
  #[serde(default)]
  pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
  pub success: bool,
  pub id:      String,
}

pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<MessageBody>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError>
where
  S: DocumentStore,
{
  let id = folio_sync::contact::submit_message(
    &*store,
    &TracingNotifier,
    &body.name,
    &body.email,
    &body.message,
  )
  .await?;
  Ok((StatusCode::CREATED, Json(CreatedResponse { success: true, id })))
}
