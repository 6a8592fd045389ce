//! [`SqliteStore`], the SQLite implementation of [`DocumentStore`].

use std::{
  path::Path,
  sync::{Arc, Mutex},
};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use folio_core::{
  document::{Document, Fields, resolve_server_timestamps},
  store::{CollectionQuery, Direction, DocumentStore, SnapshotSender, Subscription},
};

use crate::{
  Result,
  encode::{RawDocument, encode_dt, encode_fields, field_path},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and subscriber list are
/// reference-counted, so clones share subscriptions.
///
/// Snapshot delivery is serialised by `fanout`: registering a subscriber and
/// re-running standing queries both happen under it, so a subscriber never
/// misses a write and never sees an older snapshot after a newer one.
#[derive(Clone)]
pub struct SqliteStore {
  conn:                   tokio_rusqlite::Connection,
  pub(crate) subscribers: Arc<Mutex<Vec<(CollectionQuery, SnapshotSender)>>>,
  fanout:                 Arc<tokio::sync::Mutex<()>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self {
      conn,
      subscribers: Arc::new(Mutex::new(Vec::new())),
      fanout: Arc::new(tokio::sync::Mutex::new(())),
    })
  }

  /// Insert or replace a document, keeping its original `seq` and
  /// `created_at` on replace.
  async fn upsert(&self, collection: &str, id: &str, mut fields: Fields) -> Result<Document> {
    let now = Utc::now();
    resolve_server_timestamps(&mut fields, now);

    let collection_str = collection.to_owned();
    let id_str         = id.to_owned();
    let fields_str     = encode_fields(&fields)?;
    let at_str         = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (collection, doc_id, fields_json, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)
           ON CONFLICT (collection, doc_id)
           DO UPDATE SET fields_json = excluded.fields_json,
                         updated_at  = excluded.updated_at",
          rusqlite::params![collection_str, id_str, fields_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(Document {
      collection: collection.to_owned(),
      id: id.to_owned(),
      fields,
      updated_at: now,
    })
  }

  async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>> {
    let collection = query.collection.clone();
    let order      = query.order_by.clone();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let select = "SELECT collection, doc_id, fields_json, updated_at FROM documents
                      WHERE collection = ?1";
        let rows = match order {
          Some((field, direction)) => {
            let dir = match direction {
              Direction::Ascending => "ASC",
              Direction::Descending => "DESC",
            };
            let sql = format!("{select} ORDER BY json_extract(fields_json, ?2) {dir}, seq {dir}");
            let mut stmt = conn.prepare(&sql)?;
            stmt
              .query_map(rusqlite::params![collection, field_path(&field)], RawDocument::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
          None => {
            let sql = format!("{select} ORDER BY seq");
            let mut stmt = conn.prepare(&sql)?;
            stmt
              .query_map(rusqlite::params![collection], RawDocument::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  /// Re-run every standing query on `collection` and push the results.
  /// Subscribers whose receiving half was dropped are pruned.
  async fn notify(&self, collection: &str) {
    let _fanout = self.fanout.lock().await;
    let targets: Vec<(CollectionQuery, SnapshotSender)> = match self.subscribers.lock() {
      Ok(mut subs) => {
        subs.retain(|(_, tx)| !tx.is_closed());
        subs
          .iter()
          .filter(|(q, _)| q.collection == collection)
          .cloned()
          .collect()
      }
      Err(_) => return,
    };

    for (query, tx) in targets {
      match self.query(&query).await {
        Ok(docs) => {
          let _ = tx.send(docs);
        }
        Err(e) => {
          tracing::warn!(collection, error = %e, "failed to refresh subscription");
        }
      }
    }
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = crate::Error;

  async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
    let collection_str = collection.to_owned();
    let id_str         = id.to_owned();

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT collection, doc_id, fields_json, updated_at FROM documents
             WHERE collection = ?1 AND doc_id = ?2",
            rusqlite::params![collection_str, id_str],
            RawDocument::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn list(&self, query: &CollectionQuery) -> Result<Vec<Document>> {
    self.query(query).await
  }

  async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<Document> {
    let doc = self.upsert(collection, id, fields).await?;
    tracing::debug!(collection, id, "document written");
    self.notify(collection).await;
    Ok(doc)
  }

  async fn add(&self, collection: &str, fields: Fields) -> Result<Document> {
    let id  = Uuid::new_v4().simple().to_string();
    let doc = self.upsert(collection, &id, fields).await?;
    tracing::debug!(collection, id = %doc.id, "document added");
    self.notify(collection).await;
    Ok(doc)
  }

  async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
    let collection_str = collection.to_owned();
    let id_str         = id.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![collection_str, id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if removed {
      tracing::debug!(collection, id, "document deleted");
      self.notify(collection).await;
    }
    Ok(removed)
  }

  async fn subscribe(&self, query: CollectionQuery) -> Result<Subscription> {
    let (tx, subscription) = Subscription::channel();
    let _fanout = self.fanout.lock().await;
    if let Ok(mut subs) = self.subscribers.lock() {
      subs.push((query.clone(), tx.clone()));
    }
    let initial = self.query(&query).await?;
    let _ = tx.send(initial);
    Ok(subscription)
  }
}
