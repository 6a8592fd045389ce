//! ImgBB image hosting.

use folio_core::remote::{ImageHost, ImageUpload};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{Error, Result, check, http_client, join};

pub const IMGBB_URL: &str = "https://api.imgbb.com";

#[derive(Clone)]
pub struct ImgbbHost {
  client:   reqwest::Client,
  base_url: String,
  api_key:  String,
}

#[derive(Deserialize)]
struct UploadResponse {
  #[serde(default)]
  success: bool,
  data:    Option<UploadData>,
}

#[derive(Deserialize)]
struct UploadData {
  url: String,
}

impl ImgbbHost {
  pub fn new(api_key: impl Into<String>) -> Result<Self> {
    Self::with_base_url(IMGBB_URL, api_key)
  }

  pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
    Ok(Self {
      client:   http_client()?,
      base_url: base_url.into(),
      api_key:  api_key.into(),
    })
  }

  /// `POST /1/upload?key=<key>` with the file in the `image` form field.
  pub async fn upload_image(&self, image: ImageUpload) -> Result<String> {
    let mut part = Part::bytes(image.bytes).file_name(image.file_name.clone());
    if let Some(ct) = &image.content_type {
      part = part.mime_str(ct)?;
    }
    let form = Form::new().part("image", part);

    let resp = self
      .client
      .post(join(&self.base_url, "/1/upload"))
      .query(&[("key", &self.api_key)])
      .multipart(form)
      .send()
      .await?;
    let body: UploadResponse = check(resp).await?.json().await?;

    match body.data {
      Some(data) if body.success => {
        tracing::debug!(file = %image.file_name, url = %data.url, "image uploaded");
        Ok(data.url)
      }
      _ => Err(Error::Rejected("image host reported failure".into())),
    }
  }
}

impl ImageHost for ImgbbHost {
  type Error = Error;

  async fn upload(&self, image: ImageUpload) -> Result<String> { self.upload_image(image).await }
}
