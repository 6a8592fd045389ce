//! Traits for the external services the portfolio consumes: image hosting,
//! public-IP lookup, and geocoding.
//!
//! HTTP implementations live in `folio-remote`; tests substitute in-memory
//! fakes.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::resource::ContactInfo;

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
  pub file_name:    String,
  /// MIME type as reported by the picker, e.g. `image/png`.
  pub content_type: Option<String>,
  pub bytes:        Vec<u8>,
}

impl ImageUpload {
  /// PNG or JPEG, judged by MIME type or, failing that, file extension.
  pub fn is_png_or_jpeg(&self) -> bool {
    match self.content_type.as_deref() {
      Some(ct) => matches!(ct, "image/png" | "image/jpeg" | "image/jpg"),
      None => {
        let lower = self.file_name.to_lowercase();
        [".png", ".jpg", ".jpeg"].iter().any(|ext| lower.ends_with(ext))
      }
    }
  }
}

/// An image host that accepts uploads and returns a public URL.
pub trait ImageHost: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn upload(
    &self,
    image: ImageUpload,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}

/// Resolves the caller's public IP address.
pub trait IpLookup: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn public_ip(&self) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}

/// A geocoding match for a free-text location query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
  pub display_name: String,
  pub lat:          String,
  pub lon:          String,
}

impl ContactInfo {
  /// Adopt a picked suggestion as the location and its coordinates.
  pub fn apply_place(&mut self, place: &PlaceSuggestion) {
    self.location = place.display_name.clone();
    self.lat = place.lat.clone();
    self.lon = place.lon.clone();
  }
}

/// Suggests places for a partial location string.
pub trait Geocoder: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn suggest<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<PlaceSuggestion>, Self::Error>> + Send + 'a;
}
