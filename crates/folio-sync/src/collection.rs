//! Editable lists backed by a whole collection: projects, skills and
//! certificates.

use std::sync::Arc;

use folio_core::{
  document::merge_shallow,
  resource::{Record, Resource},
  store::{CollectionQuery, DocumentStore},
};

use crate::{Result, error::store_err, notify::Notifier};

/// Asks the user to confirm a destructive action. Blocks until answered.
pub trait Confirm {
  fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
  fn confirm(&self, prompt: &str) -> bool { self(prompt) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  Deleted,
  Cancelled,
  /// The record was already gone.
  Missing,
}

/// Fetch and decode a whole collection. Undecodable documents are skipped.
pub async fn fetch_all<S, R>(store: &S, query: &CollectionQuery) -> Result<Vec<Record<R>>>
where
  S: DocumentStore,
  R: Resource,
{
  let docs = store.list(query).await.map_err(store_err)?;
  Ok(
    docs
      .into_iter()
      .filter_map(|doc| match R::from_fields(&doc.fields) {
        Ok(value) => Some(Record { id: doc.id, value }),
        Err(e) => {
          tracing::warn!(collection = R::COLLECTION, id = %doc.id, error = %e, "skipping document");
          None
        }
      })
      .collect(),
  )
}

pub struct CollectionEditor<S, R> {
  store:    Arc<S>,
  notifier: Arc<dyn Notifier>,
  items:    Vec<Record<R>>,
}

impl<S, R> CollectionEditor<S, R>
where
  S: DocumentStore,
  R: Resource,
{
  pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
    Self { store, notifier, items: Vec::new() }
  }

  pub fn items(&self) -> &[Record<R>] { &self.items }

  pub fn find(&self, id: &str) -> Option<&Record<R>> { self.items.iter().find(|r| r.id == id) }

  /// Replace the local list with the collection's current contents. On
  /// failure the list is emptied.
  pub async fn refresh(&mut self) {
    match fetch_all(&*self.store, &CollectionQuery::all(R::COLLECTION)).await {
      Ok(items) => self.items = items,
      Err(e) => {
        tracing::error!(collection = R::COLLECTION, error = %e, "refresh failed");
        self.items.clear();
        self.notifier.error(&format!("Failed to load {}", R::COLLECTION));
      }
    }
  }

  /// Validate and add a new record, then refresh. Returns the new id.
  pub async fn create(&mut self, value: R) -> Result<String> {
    if let Err(e) = value.validate_against(&self.items, None) {
      self.notifier.error(&e.to_string());
      return Err(e.into());
    }
    match self.insert(&value).await {
      Ok(id) => {
        self.notifier.success("Added successfully");
        self.refresh().await;
        Ok(id)
      }
      Err(e) => {
        tracing::error!(collection = R::COLLECTION, error = %e, "create failed");
        self.notifier.error(&format!("Failed to add to {}", R::COLLECTION));
        Err(e)
      }
    }
  }

  /// Validate and merge `value` into the existing record `id`, then refresh.
  /// Fields the resource does not know about are kept.
  pub async fn update(&mut self, id: &str, value: R) -> Result<()> {
    if let Err(e) = value.validate_against(&self.items, Some(id)) {
      self.notifier.error(&e.to_string());
      return Err(e.into());
    }
    match self.merge_into(id, &value).await {
      Ok(()) => {
        self.notifier.success("Updated successfully");
        self.refresh().await;
        Ok(())
      }
      Err(e) => {
        tracing::error!(collection = R::COLLECTION, id, error = %e, "update failed");
        self.notifier.error(&format!("Failed to update {}", R::COLLECTION));
        Err(e)
      }
    }
  }

  /// Delete after confirmation. Nothing is written if the user declines.
  pub async fn delete(&mut self, id: &str, confirm: &impl Confirm) -> Result<DeleteOutcome> {
    if !confirm.confirm("Are you sure you want to delete this item?") {
      return Ok(DeleteOutcome::Cancelled);
    }
    match self.store.delete(R::COLLECTION, id).await {
      Ok(existed) => {
        if existed {
          self.notifier.success("Deleted successfully");
        }
        self.refresh().await;
        Ok(if existed { DeleteOutcome::Deleted } else { DeleteOutcome::Missing })
      }
      Err(e) => {
        tracing::error!(collection = R::COLLECTION, id, error = %e, "delete failed");
        self.notifier.error(&format!("Failed to delete from {}", R::COLLECTION));
        Err(store_err(e))
      }
    }
  }

  async fn insert(&self, value: &R) -> Result<String> {
    let fields = value.to_fields()?;
    let doc = self.store.add(R::COLLECTION, fields).await.map_err(store_err)?;
    Ok(doc.id)
  }

  async fn merge_into(&self, id: &str, value: &R) -> Result<()> {
    let current = self
      .store
      .get(R::COLLECTION, id)
      .await
      .map_err(store_err)?
      .map(|d| d.fields)
      .unwrap_or_default();
    let merged = merge_shallow(current, value.to_fields()?);
    self.store.set(R::COLLECTION, id, merged).await.map_err(store_err)?;
    Ok(())
  }
}
