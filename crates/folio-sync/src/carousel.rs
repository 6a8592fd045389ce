//! Image carousels and their auto-advance timers.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
  time::Duration,
};

use tokio::{
  task::JoinHandle,
  time::{Instant, interval_at},
};

pub const AUTO_ADVANCE: Duration = Duration::from_secs(3);

/// Shown in place of an empty image list.
pub const FALLBACK_IMAGE: &str = "/placeholder.png";

/// A cursor into a shared image list.
#[derive(Debug, Clone)]
pub struct Carousel {
  images: Arc<[String]>,
  cursor: usize,
}

impl Carousel {
  pub fn new(images: Arc<[String]>) -> Self { Self { images, cursor: 0 } }

  /// Point the carousel at `images`. The cursor resets unless `images` is the
  /// very list already shown.
  pub fn set_images(&mut self, images: Arc<[String]>) {
    if !Arc::ptr_eq(&self.images, &images) {
      self.images = images;
      self.cursor = 0;
    }
  }

  pub fn cursor(&self) -> usize { self.cursor }

  pub fn len(&self) -> usize { self.images.len() }

  pub fn is_empty(&self) -> bool { self.images.is_empty() }

  /// The image under the cursor, or [`FALLBACK_IMAGE`].
  pub fn current(&self) -> &str {
    self
      .images
      .get(self.cursor)
      .map(String::as_str)
      .unwrap_or(FALLBACK_IMAGE)
  }

  pub fn next(&mut self) {
    if !self.images.is_empty() {
      self.cursor = (self.cursor + 1) % self.images.len();
    }
  }

  pub fn prev(&mut self) {
    let len = self.images.len();
    if len > 0 {
      self.cursor = (self.cursor + len - 1) % len;
    }
  }

  pub fn tick(&mut self) { self.next() }
}

/// Advances a shared carousel every `period`. The timer stops when the ticker
/// is dropped.
#[derive(Debug)]
pub struct CarouselTicker {
  handle: JoinHandle<()>,
}

impl CarouselTicker {
  pub fn spawn(carousel: Arc<Mutex<Carousel>>, period: Duration) -> Self {
    let handle = tokio::spawn(async move {
      let mut interval = interval_at(Instant::now() + period, period);
      loop {
        interval.tick().await;
        match carousel.lock() {
          Ok(mut c) => c.tick(),
          Err(_) => break,
        }
      }
    });
    Self { handle }
  }
}

impl Drop for CarouselTicker {
  fn drop(&mut self) { self.handle.abort(); }
}

/// One carousel per record, e.g. per project or certificate card.
#[derive(Debug, Default)]
pub struct CarouselSet {
  carousels: HashMap<String, Arc<Mutex<Carousel>>>,
  tickers:   Vec<CarouselTicker>,
}

impl CarouselSet {
  pub fn new() -> Self { Self::default() }

  /// Rebuild for a new record list. All previous timers are stopped; each
  /// record with more than one image gets a fresh one.
  pub fn sync<'a>(&mut self, records: impl IntoIterator<Item = (&'a str, Arc<[String]>)>) {
    self.tickers.clear();
    self.carousels.clear();
    for (id, images) in records {
      let multi = images.len() > 1;
      let carousel = Arc::new(Mutex::new(Carousel::new(images)));
      if multi {
        self.tickers.push(CarouselTicker::spawn(Arc::clone(&carousel), AUTO_ADVANCE));
      }
      self.carousels.insert(id.to_owned(), carousel);
    }
  }

  pub fn timer_count(&self) -> usize { self.tickers.len() }

  /// The image currently shown for `id`, or [`FALLBACK_IMAGE`] for unknown
  /// ids.
  pub fn current(&self, id: &str) -> String {
    self
      .with(id, |c| c.current().to_owned())
      .unwrap_or_else(|| FALLBACK_IMAGE.to_owned())
  }

  pub fn next(&self, id: &str) { self.with(id, Carousel::next); }

  pub fn prev(&self, id: &str) { self.with(id, Carousel::prev); }

  pub fn cursor(&self, id: &str) -> Option<usize> { self.with(id, |c| c.cursor()) }

  fn with<T>(&self, id: &str, f: impl FnOnce(&mut Carousel) -> T) -> Option<T> {
    let carousel = self.carousels.get(id)?;
    let mut guard = carousel.lock().ok()?;
    Some(f(&mut guard))
  }
}
