//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure renders as `{"success": false, "message": ...}`; server-side
//! failures also carry the underlying `error`.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("{message}: {source}")]
  Internal {
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap a lower-level failure under a client-facing `message`.
  pub fn internal<E>(message: &'static str) -> impl FnOnce(E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    move |e| Self::Internal { message, source: Box::new(e) }
  }
}

impl From<folio_sync::Error> for ApiError {
  fn from(e: folio_sync::Error) -> Self {
    match e {
      folio_sync::Error::Core(folio_core::Error::Validation(m)) => Self::BadRequest(m),
      folio_sync::Error::InvalidCredentials => Self::Unauthorized("Invalid email or password.".into()),
      folio_sync::Error::CredentialsMissing => {
        Self::Unauthorized("Admin credentials not set. Contact support.".into())
      }
      other => Self::Internal { message: "Internal error", source: Box::new(other) },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "success": false, "message": m }))).into_response()
      }
      ApiError::Unauthorized(m) => {
        let mut res =
          (StatusCode::UNAUTHORIZED, Json(json!({ "success": false, "message": m }))).into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"folio\""),
        );
        res
      }
      ApiError::Internal { message, source } => {
        tracing::error!(error = %source, "{message}");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "success": false, "message": message, "error": source.to_string() })),
        )
          .into_response()
      }
    }
  }
}
