//! HTTP clients for the services Folio talks to: the image host, the public-IP
//! lookup, the geocoder, and Folio's own REST API.
//!
//! Each client takes its base URL at construction so tests can point it at a
//! mock server.

pub mod api;
pub mod error;
pub mod geocode;
pub mod image;
pub mod ip;

use std::time::Duration;

pub use error::{Error, Result};

const TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

pub(crate) fn http_client() -> Result<reqwest::Client> {
  Ok(
    reqwest::Client::builder()
      .timeout(TIMEOUT)
      .user_agent(USER_AGENT)
      .build()?,
  )
}

pub(crate) fn join(base: &str, path: &str) -> String {
  format!("{}{}", base.trim_end_matches('/'), path)
}

/// Turn a non-2xx response into [`Error::Status`], keeping the body for the
/// log.
pub(crate) async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Status { status: status.as_u16(), body })
}
