//! The live contact-message inbox.

use std::{
  collections::HashSet,
  sync::Arc,
  time::{Duration, Instant},
};

use folio_core::{
  document::Document,
  resource::{ContactMessage, Record, Resource},
  store::{CollectionQuery, Direction, DocumentStore, Subscription},
};

use crate::{Result, error::store_err, notify::Notifier};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Plays the new-message sound.
pub trait Chime: Send + Sync {
  fn play(&self);
}

/// No sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Chime for Silent {
  fn play(&self) {}
}

/// Newest first.
pub fn inbox_query() -> CollectionQuery {
  CollectionQuery::ordered(ContactMessage::COLLECTION, "timestamp", Direction::Descending)
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// A search box whose term takes effect only after the input has been idle
/// for [`SEARCH_DEBOUNCE`].
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
  input:      String,
  applied:    String,
  last_input: Option<Instant>,
}

impl SearchFilter {
  pub fn input(&mut self, term: &str, now: Instant) {
    self.input = term.to_owned();
    self.last_input = Some(now);
  }

  /// Reset immediately, without waiting for the debounce.
  pub fn clear(&mut self) {
    self.input.clear();
    self.applied.clear();
    self.last_input = None;
  }

  /// Apply the pending input if it has settled. Returns the term in effect.
  pub fn settle(&mut self, now: Instant) -> &str {
    let settled = self
      .last_input
      .is_some_and(|at| now.duration_since(at) >= SEARCH_DEBOUNCE);
    if settled {
      self.applied = self.input.clone();
      self.last_input = None;
    }
    &self.applied
  }

  pub fn pending(&self) -> &str { &self.input }
}

/// Case-insensitive substring match over name, email and the formatted date.
pub fn matches(message: &ContactMessage, term: &str) -> bool {
  if term.is_empty() {
    return true;
  }
  let term = term.to_lowercase();
  let date = message.display_date();
  [message.name.as_str(), message.email.as_str(), date.as_str()]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

// ─── Inbox ───────────────────────────────────────────────────────────────────

pub struct MessageInbox<S> {
  store:          Arc<S>,
  notifier:       Arc<dyn Notifier>,
  chime:          Arc<dyn Chime>,
  messages:       Vec<Record<ContactMessage>>,
  seen:           HashSet<String>,
  interacted:     bool,
  search:         SearchFilter,
  pending_delete: Option<String>,
}

impl<S: DocumentStore> MessageInbox<S> {
  pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>, chime: Arc<dyn Chime>) -> Self {
    Self {
      store,
      notifier,
      chime,
      messages: Vec::new(),
      seen: HashSet::new(),
      interacted: false,
      search: SearchFilter::default(),
      pending_delete: None,
    }
  }

  pub async fn subscribe(&self) -> Result<Subscription> {
    self.store.subscribe(inbox_query()).await.map_err(store_err)
  }

  /// Wait for the next snapshot and apply it. Returns the ids that arrived
  /// with it, or `None` once the subscription has closed.
  pub async fn next_update(&mut self, subscription: &mut Subscription) -> Option<Vec<String>> {
    let docs = subscription.next().await?;
    Some(self.apply_snapshot(docs))
  }

  /// Replace the local list with `docs`. The chime plays when messages arrive
  /// on top of an already non-empty inbox, once the user has interacted.
  pub fn apply_snapshot(&mut self, docs: Vec<Document>) -> Vec<String> {
    let messages: Vec<Record<ContactMessage>> = docs
      .into_iter()
      .filter_map(|doc| {
        ContactMessage::from_fields(&doc.fields)
          .ok()
          .map(|value| Record { id: doc.id, value })
      })
      .collect();

    let arrived: Vec<String> = messages
      .iter()
      .filter(|m| !self.seen.contains(&m.id))
      .map(|m| m.id.clone())
      .collect();

    if !self.seen.is_empty() && !arrived.is_empty() && self.interacted {
      self.chime.play();
    }

    self.seen = messages.iter().map(|m| m.id.clone()).collect();
    self.messages = messages;
    arrived
  }

  /// The first click or key press. Until then the chime stays silent.
  pub fn mark_interacted(&mut self) { self.interacted = true; }

  pub fn messages(&self) -> &[Record<ContactMessage>] { &self.messages }

  pub fn search(&mut self, term: &str, now: Instant) { self.search.input(term, now); }

  pub fn clear_search(&mut self) { self.search.clear(); }

  /// Messages matching the settled search term, newest first.
  pub fn visible(&mut self, now: Instant) -> Vec<&Record<ContactMessage>> {
    let term = self.search.settle(now).to_owned();
    self
      .messages
      .iter()
      .filter(|m| matches(&m.value, &term))
      .collect()
  }

  pub fn request_delete(&mut self, id: &str) { self.pending_delete = Some(id.to_owned()); }

  pub fn cancel_delete(&mut self) { self.pending_delete = None; }

  pub fn pending_delete(&self) -> Option<&str> { self.pending_delete.as_deref() }

  /// Delete the message awaiting confirmation. The pending request is cleared
  /// whether or not the delete succeeds. The list itself updates through the
  /// subscription.
  pub async fn confirm_delete(&mut self) -> Result<bool> {
    let Some(id) = self.pending_delete.take() else {
      return Ok(false);
    };
    match self.store.delete(ContactMessage::COLLECTION, &id).await {
      Ok(existed) => {
        self.notifier.success("Message deleted successfully");
        Ok(existed)
      }
      Err(e) => {
        tracing::error!(id = %id, error = %e, "failed to delete message");
        self.notifier.error("Failed to delete message");
        Err(store_err(e))
      }
    }
  }
}
