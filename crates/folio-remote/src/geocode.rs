//! Place search via Nominatim.

use folio_core::remote::{Geocoder, PlaceSuggestion};

use crate::{Error, Result, check, http_client, join};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Clone)]
pub struct NominatimGeocoder {
  client:   reqwest::Client,
  base_url: String,
}

impl NominatimGeocoder {
  pub fn new() -> Result<Self> { Self::with_base_url(NOMINATIM_URL) }

  pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
    Ok(Self { client: http_client()?, base_url: base_url.into() })
  }
}

impl Geocoder for NominatimGeocoder {
  type Error = Error;

  /// `GET /search?format=json&q=<query>`
  async fn suggest<'a>(&'a self, query: &'a str) -> Result<Vec<PlaceSuggestion>> {
    let resp = self
      .client
      .get(join(&self.base_url, "/search"))
      .query(&[("format", "json"), ("q", query)])
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
  };

  use super::*;

  #[tokio::test]
  async fn decodes_matches_and_ignores_extra_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/search"))
      .and(query_param("q", "Berlin"))
      .and(query_param("format", "json"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        {
          "place_id": 1,
          "display_name": "Berlin, Deutschland",
          "lat": "52.5170365",
          "lon": "13.3888599",
          "importance": 0.9
        }
      ])))
      .mount(&server)
      .await;

    let geo = NominatimGeocoder::with_base_url(server.uri()).unwrap();
    let places = geo.suggest("Berlin").await.unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].display_name, "Berlin, Deutschland");
    assert_eq!(places[0].lat, "52.5170365");
  }

  #[tokio::test]
  async fn server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let geo = NominatimGeocoder::with_base_url(server.uri()).unwrap();
    assert!(matches!(geo.suggest("Berlin").await, Err(Error::Status { status: 503, .. })));
  }
}
