//! Image uploads: image lists on projects and certificates, the two about
//! images, and the résumé.

use std::sync::Arc;

use folio_core::{
  remote::{ImageHost, ImageUpload},
  resource::AboutContent,
  store::DocumentStore,
};

use crate::{
  Error, Result,
  editor::DocumentEditor,
  error::remote_err,
  notify::Notifier,
};

/// An ordered list of image URLs.
///
/// Every change produces a new shared slice, so a [`Carousel`] holding the
/// previous one can tell the list changed.
///
/// [`Carousel`]: crate::carousel::Carousel
#[derive(Debug, Clone, Default)]
pub struct ImageList {
  urls: Arc<[String]>,
}

impl ImageList {
  pub fn new(urls: Vec<String>) -> Self { Self { urls: urls.into() } }

  pub fn urls(&self) -> &[String] { &self.urls }

  pub fn shared(&self) -> Arc<[String]> { Arc::clone(&self.urls) }

  pub fn is_empty(&self) -> bool { self.urls.is_empty() }

  pub fn len(&self) -> usize { self.urls.len() }

  /// Upload `image` and append its URL. Failures are reported and leave the
  /// list unchanged.
  pub async fn upload<H: ImageHost>(
    &mut self,
    host: &H,
    notifier: &dyn Notifier,
    image: ImageUpload,
  ) -> Result<String> {
    match host.upload(image).await {
      Ok(url) => {
        let mut urls = self.urls.to_vec();
        urls.push(url.clone());
        self.urls = urls.into();
        notifier.success("Image uploaded successfully");
        Ok(url)
      }
      Err(e) => {
        tracing::error!(error = %e, "image upload failed");
        notifier.error("Failed to upload image");
        Err(remote_err(e))
      }
    }
  }

  pub fn remove(&mut self, index: usize) -> Option<String> {
    if index >= self.urls.len() {
      return None;
    }
    let mut urls = self.urls.to_vec();
    let removed = urls.remove(index);
    self.urls = urls.into();
    Some(removed)
  }

  pub fn to_vec(&self) -> Vec<String> { self.urls.to_vec() }
}

/// Which of the two about-section images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AboutImage {
  About,
  Home,
}

impl AboutImage {
  pub fn field(self) -> &'static str {
    match self {
      Self::About => "aboutImage",
      Self::Home => "homeImage",
    }
  }

  fn slot(self, about: &mut AboutContent) -> &mut Option<String> {
    match self {
      Self::About => &mut about.about_image,
      Self::Home => &mut about.home_image,
    }
  }
}

/// Upload an about-section image and persist its URL in that field alone.
pub async fn upload_about_image<S, H>(
  editor: &mut DocumentEditor<S, AboutContent>,
  host: &H,
  which: AboutImage,
  image: ImageUpload,
) -> Result<String>
where
  S: DocumentStore,
  H: ImageHost,
{
  let url = upload_or_report(host, editor.notifier(), image).await?;
  let stored = url.clone();
  editor
    .save_fields(&[which.field()], move |about| *which.slot(about) = Some(stored))
    .await?;
  Ok(url)
}

/// Upload a résumé image and persist its URL and file name. Only PNG and JPEG
/// are accepted.
pub async fn upload_resume<S, H>(
  editor: &mut DocumentEditor<S, AboutContent>,
  host: &H,
  image: ImageUpload,
) -> Result<String>
where
  S: DocumentStore,
  H: ImageHost,
{
  if !image.is_png_or_jpeg() {
    editor.notifier().error("Only PNG or JPEG images are allowed");
    return Err(folio_core::Error::Validation("résumé must be a PNG or JPEG image".into()).into());
  }
  let file_name = image.file_name.clone();
  let url = upload_or_report(host, editor.notifier(), image).await?;
  let stored = url.clone();
  editor
    .save_fields(&["resumeFile", "resumeFileName"], move |about| {
      about.resume_file = Some(stored);
      about.resume_file_name = Some(file_name);
    })
    .await?;
  Ok(url)
}

async fn upload_or_report<H: ImageHost>(
  host: &H,
  notifier: &dyn Notifier,
  image: ImageUpload,
) -> Result<String> {
  host.upload(image).await.map_err(|e| {
    tracing::error!(error = %e, "image upload failed");
    notifier.error("Failed to upload image");
    Error::Remote(Box::new(e))
  })
}
