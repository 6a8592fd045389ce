//! `POST /presence`: visitor heartbeat. Body: `{"ip": "203.0.113.7"}`.

use std::{net::IpAddr, sync::Arc};

use axum::{Json, extract::State, http::StatusCode};
use folio_core::store::DocumentStore;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct HeartbeatBody {
  pub ip: String,
}

pub async fn heartbeat<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<HeartbeatBody>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
{
  let ip: IpAddr = body
    .ip
    .trim()
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("not an IP address: {:?}", body.ip)))?;
  folio_sync::presence::record_heartbeat(&*store, &ip.to_string())
    .await
    .map_err(ApiError::internal("Error recording visit"))?;
  Ok(StatusCode::NO_CONTENT)
}
