//! Shared fixtures for unit tests.

use std::sync::{
  Arc, Mutex,
  atomic::{AtomicBool, AtomicUsize, Ordering},
};

use folio_core::{
  document::{Document, Fields},
  remote::{Geocoder, ImageHost, ImageUpload, IpLookup, PlaceSuggestion},
  store::{CollectionQuery, DocumentStore, Subscription},
};
use folio_store_sqlite::SqliteStore;

use crate::notify::{Level, Notice, Notifier};

pub async fn store() -> Arc<SqliteStore> {
  Arc::new(SqliteStore::open_in_memory().await.expect("in-memory store"))
}

pub fn notifier() -> Arc<MemoryNotifier> { Arc::new(MemoryNotifier::default()) }

// ─── Notices ─────────────────────────────────────────────────────────────────

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
  notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
  pub fn notices(&self) -> Vec<Notice> {
    self.notices.lock().map(|n| n.clone()).unwrap_or_default()
  }

  pub fn last(&self) -> Option<Notice> { self.notices().pop() }

  pub fn count(&self, level: Level) -> usize {
    self.notices().iter().filter(|n| n.level == level).count()
  }
}

impl Notifier for MemoryNotifier {
  fn notify(&self, notice: Notice) {
    if let Ok(mut n) = self.notices.lock() {
      n.push(notice);
    }
  }
}

// ─── Flaky store ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FlakyError {
  #[error("store offline")]
  Offline,
  #[error(transparent)]
  Store(#[from] folio_store_sqlite::Error),
}

/// An in-memory store whose reads and writes can be switched off.
pub struct FlakyStore {
  inner:       SqliteStore,
  fail_reads:  AtomicBool,
  fail_writes: AtomicBool,
}

impl FlakyStore {
  pub async fn new() -> Arc<Self> {
    Arc::new(Self {
      inner:       SqliteStore::open_in_memory().await.expect("in-memory store"),
      fail_reads:  AtomicBool::new(false),
      fail_writes: AtomicBool::new(false),
    })
  }

  pub fn fail_reads(&self, on: bool) { self.fail_reads.store(on, Ordering::SeqCst); }

  pub fn fail_writes(&self, on: bool) { self.fail_writes.store(on, Ordering::SeqCst); }

  fn check(flag: &AtomicBool) -> Result<(), FlakyError> {
    if flag.load(Ordering::SeqCst) {
      return Err(FlakyError::Offline);
    }
    Ok(())
  }
}

impl DocumentStore for FlakyStore {
  type Error = FlakyError;

  async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, FlakyError> {
    Self::check(&self.fail_reads)?;
    Ok(self.inner.get(collection, id).await?)
  }

  async fn list(&self, query: &CollectionQuery) -> Result<Vec<Document>, FlakyError> {
    Self::check(&self.fail_reads)?;
    Ok(self.inner.list(query).await?)
  }

  async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<Document, FlakyError> {
    Self::check(&self.fail_writes)?;
    Ok(self.inner.set(collection, id, fields).await?)
  }

  async fn add(&self, collection: &str, fields: Fields) -> Result<Document, FlakyError> {
    Self::check(&self.fail_writes)?;
    Ok(self.inner.add(collection, fields).await?)
  }

  async fn delete(&self, collection: &str, id: &str) -> Result<bool, FlakyError> {
    Self::check(&self.fail_writes)?;
    Ok(self.inner.delete(collection, id).await?)
  }

  async fn subscribe(&self, query: CollectionQuery) -> Result<Subscription, FlakyError> {
    Self::check(&self.fail_reads)?;
    Ok(self.inner.subscribe(query).await?)
  }
}

// ─── Remote fakes ────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub &'static str);

/// Hands out `https://img.test/<n>/<file>` for each upload.
#[derive(Debug, Default)]
pub struct FakeHost {
  pub fail: bool,
  uploads:  AtomicUsize,
}

impl FakeHost {
  pub fn failing() -> Self { Self { fail: true, ..Default::default() } }

  pub fn uploads(&self) -> usize { self.uploads.load(Ordering::SeqCst) }
}

impl ImageHost for FakeHost {
  type Error = FakeError;

  async fn upload(&self, image: ImageUpload) -> Result<String, FakeError> {
    if self.fail {
      return Err(FakeError("host unavailable"));
    }
    let n = self.uploads.fetch_add(1, Ordering::SeqCst);
    Ok(format!("https://img.test/{n}/{}", image.file_name))
  }
}

pub fn png(name: &str) -> ImageUpload {
  ImageUpload {
    file_name:    name.into(),
    content_type: Some("image/png".into()),
    bytes:        vec![0x89, b'P', b'N', b'G'],
  }
}

pub struct FakeIp(pub Option<&'static str>);

impl IpLookup for FakeIp {
  type Error = FakeError;

  async fn public_ip(&self) -> Result<String, FakeError> {
    self.0.map(str::to_owned).ok_or(FakeError("lookup failed"))
  }
}

/// Records every query it is asked.
#[derive(Default)]
pub struct FakeGeocoder {
  pub queries: Mutex<Vec<String>>,
}

impl Geocoder for FakeGeocoder {
  type Error = FakeError;

  async fn suggest<'a>(&'a self, query: &'a str) -> Result<Vec<PlaceSuggestion>, FakeError> {
    if let Ok(mut q) = self.queries.lock() {
      q.push(query.to_owned());
    }
    Ok(vec![PlaceSuggestion {
      display_name: format!("{query}, Somewhere"),
      lat:          "1.5".into(),
      lon:          "2.5".into(),
    }])
  }
}
