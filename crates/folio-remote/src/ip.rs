//! Public-IP lookup via ipify.

use folio_core::remote::IpLookup;
use serde::Deserialize;

use crate::{Error, Result, check, http_client, join};

pub const IPIFY_URL: &str = "https://api.ipify.org";

#[derive(Clone)]
pub struct IpifyLookup {
  client:   reqwest::Client,
  base_url: String,
}

#[derive(Deserialize)]
struct IpResponse {
  ip: String,
}

impl IpifyLookup {
  pub fn new() -> Result<Self> { Self::with_base_url(IPIFY_URL) }

  pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
    Ok(Self { client: http_client()?, base_url: base_url.into() })
  }
}

impl IpLookup for IpifyLookup {
  type Error = Error;

  /// `GET /?format=json`
  async fn public_ip(&self) -> Result<String> {
    let resp = self
      .client
      .get(join(&self.base_url, "/"))
      .query(&[("format", "json")])
      .send()
      .await?;
    let body: IpResponse = check(resp).await?.json().await?;
    Ok(body.ip)
  }
}
