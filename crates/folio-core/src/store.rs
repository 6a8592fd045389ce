//! The `DocumentStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `folio-store-sqlite`).
//! Editors (`folio-sync`) and the HTTP layer (`folio-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use tokio::sync::mpsc;

use crate::document::{Document, Fields};

// ─── Query type ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
  #[default]
  Ascending,
  Descending,
}

/// Parameters for [`DocumentStore::list`] and [`DocumentStore::subscribe`].
///
/// Scans are never paginated; collections are expected to stay small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
  pub collection: String,
  /// Order by a top-level field. Documents missing the field sort first in
  /// ascending order. Without an ordering, documents come back in insertion
  /// order.
  pub order_by:   Option<(String, Direction)>,
}

impl CollectionQuery {
  pub fn all(collection: impl Into<String>) -> Self {
    Self { collection: collection.into(), order_by: None }
  }

  pub fn ordered(
    collection: impl Into<String>,
    field: impl Into<String>,
    direction: Direction,
  ) -> Self {
    Self {
      collection: collection.into(),
      order_by:   Some((field.into(), direction)),
    }
  }
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

/// A standing query. Every notification carries the full, freshly-queried
/// result set; the first one is delivered immediately on subscribe.
///
/// Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct Subscription {
  rx: mpsc::UnboundedReceiver<Vec<Document>>,
}

/// The store-side half of a [`Subscription`].
pub type SnapshotSender = mpsc::UnboundedSender<Vec<Document>>;

impl Subscription {
  pub fn channel() -> (SnapshotSender, Self) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, Self { rx })
  }

  /// Wait for the next snapshot. Returns `None` once the store has gone away.
  pub async fn next(&mut self) -> Option<Vec<Document>> { self.rx.recv().await }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a document store backend.
///
/// Writes are last-write-wins: there is no version check, so two writers
/// racing on one document silently keep the later write.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Point read. Returns `None` if the document does not exist.
  fn get<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// Full collection scan.
  fn list<'a>(
    &'a self,
    query: &'a CollectionQuery,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Create or replace a document. Server-timestamp sentinels in `fields` are
  /// resolved to the write time.
  fn set<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
    fields: Fields,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + 'a;

  /// Create a document with a store-assigned id.
  fn add<'a>(
    &'a self,
    collection: &'a str,
    fields: Fields,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + 'a;

  /// Delete a document. Returns whether it existed. No cascade.
  fn delete<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Open a standing query that is re-evaluated after every write to the
  /// queried collection.
  fn subscribe(
    &self,
    query: CollectionQuery,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;
}
