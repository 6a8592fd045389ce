//! Load/edit/save state machine for singleton documents.
//!
//! ```text
//!   Loading ──load──▶ Viewing ──edit──▶ Editing ──save──▶ Saving ──ok──▶ Viewing
//!                        ▲                 │                 │
//!                        └─────cancel──────┘                 └──err──▶ Editing
//! ```
//!
//! Saving reads the current remote document and writes it back with the
//! editor's own fields laid over it, so two editors sharing a document (the
//! about text and the about images, say) never erase each other's fields.

use std::sync::Arc;

use folio_core::{
  document::{Fields, merge_shallow, project},
  resource::Singleton,
  store::DocumentStore,
};
use serde_json::Value;

use crate::{
  Error, Result,
  error::store_err,
  notify::Notifier,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
  Loading,
  Viewing,
  Editing,
  Saving,
}

impl EditorState {
  fn name(self) -> &'static str {
    match self {
      Self::Loading => "loading",
      Self::Viewing => "viewing",
      Self::Editing => "editing",
      Self::Saving => "saving",
    }
  }
}

pub struct DocumentEditor<S, R> {
  store:     Arc<S>,
  notifier:  Arc<dyn Notifier>,
  /// The top-level fields this editor owns. Only these are written on save.
  owned:     Vec<String>,
  state:     EditorState,
  persisted: R,
  buffer:    R,
}

impl<S, R> DocumentEditor<S, R>
where
  S: DocumentStore,
  R: Singleton,
{
  /// An editor owning every field of `R`.
  pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
    Self {
      store,
      notifier,
      owned: R::field_names(),
      state: EditorState::Loading,
      persisted: R::default(),
      buffer: R::default(),
    }
  }

  /// Restrict the editor to a subset of the document's fields.
  pub fn with_fields(mut self, fields: &[&str]) -> Self {
    self.owned = fields.iter().map(|f| (*f).to_owned()).collect();
    self
  }

  pub fn state(&self) -> EditorState { self.state }

  /// The last value read from or written to the store.
  pub fn persisted(&self) -> &R { &self.persisted }

  /// The working copy. Equal to [`persisted`](Self::persisted) outside of
  /// editing.
  pub fn buffer(&self) -> &R { &self.buffer }

  pub fn owned_fields(&self) -> &[String] { &self.owned }

  pub(crate) fn notifier(&self) -> &dyn Notifier { &*self.notifier }

  /// Fetch the document. A missing or unreadable document loads as the
  /// resource's default; a store failure is reported and also falls back to
  /// the default.
  pub async fn load(&mut self) {
    self.state = EditorState::Loading;
    let value = match self.store.get(R::COLLECTION, R::DOC_ID).await {
      Ok(Some(doc)) => R::from_fields(&doc.fields).unwrap_or_else(|e| {
        tracing::warn!(collection = R::COLLECTION, error = %e, "undecodable document");
        R::default()
      }),
      Ok(None) => R::default(),
      Err(e) => {
        tracing::error!(collection = R::COLLECTION, error = %e, "failed to load document");
        self.notifier.error(&format!("Failed to load {}", R::COLLECTION));
        R::default()
      }
    };
    self.persisted = value.clone();
    self.buffer = value;
    self.state = EditorState::Viewing;
  }

  /// Start editing from the persisted value. Already editing is a no-op and
  /// keeps the draft.
  pub fn edit(&mut self) -> Result<()> {
    if self.state == EditorState::Editing {
      return Ok(());
    }
    self.require_state(EditorState::Viewing, "edit")?;
    self.buffer = self.persisted.clone();
    self.state = EditorState::Editing;
    Ok(())
  }

  /// Change the working copy. Only allowed while editing.
  pub fn update(&mut self, f: impl FnOnce(&mut R)) -> Result<()> {
    self.require_state(EditorState::Editing, "update")?;
    f(&mut self.buffer);
    Ok(())
  }

  /// Drop unsaved changes.
  pub fn cancel(&mut self) {
    if self.state == EditorState::Editing {
      self.buffer = self.persisted.clone();
      self.state = EditorState::Viewing;
    }
  }

  /// Validate and persist the owned fields. On failure the editor stays in
  /// editing with the buffer intact, and the error is reported before it is
  /// returned.
  pub async fn save(&mut self) -> Result<()> {
    self.require_state(EditorState::Editing, "save")?;
    if let Err(e) = self.buffer.validate() {
      self.notifier.error(&e.to_string());
      return Err(e.into());
    }

    self.state = EditorState::Saving;
    let owned = self.owned.clone();
    let staged = self.buffer.clone();
    match self.write(&staged, &owned).await {
      Ok(written) => {
        self.persisted = written.clone();
        self.buffer = written;
        self.state = EditorState::Viewing;
        self.notifier.success(&format!("Saved {}", R::COLLECTION));
        Ok(())
      }
      Err(e) => {
        self.state = EditorState::Editing;
        tracing::error!(collection = R::COLLECTION, error = %e, "save failed");
        self.notifier.error(&format!("Failed to save {}", R::COLLECTION));
        Err(e)
      }
    }
  }

  /// Set fields on the working copy and persist just those fields straight
  /// away. Works while viewing or editing; other pending edits in the buffer
  /// are kept but not written.
  pub async fn save_fields(&mut self, fields: &[&str], f: impl FnOnce(&mut R)) -> Result<()> {
    if !matches!(self.state, EditorState::Viewing | EditorState::Editing) {
      return Err(self.invalid("save fields"));
    }
    let mut staged = self.buffer.clone();
    f(&mut staged);
    let keys: Vec<String> = fields.iter().map(|f| (*f).to_owned()).collect();

    match self.write(&staged, &keys).await {
      Ok(written) => {
        let fresh = written.to_fields()?;
        let mut buffer = self.buffer.to_fields()?;
        for key in &keys {
          buffer.insert(key.clone(), fresh.get(key).cloned().unwrap_or(Value::Null));
        }
        self.buffer = R::from_fields(&buffer)?;
        self.persisted = written;
        self.notifier.success(&format!("Saved {}", fields.join(", ")));
        Ok(())
      }
      Err(e) => {
        tracing::error!(collection = R::COLLECTION, error = %e, "field save failed");
        self.notifier.error(&format!("Failed to save {}", fields.join(", ")));
        Err(e)
      }
    }
  }

  /// Null out one field remotely and locally.
  pub async fn clear_field(&mut self, field: &str) -> Result<()> {
    let mut cleared = self.buffer.to_fields()?;
    cleared.insert(field.to_owned(), Value::Null);
    let cleared = R::from_fields(&cleared)?;
    self.save_fields(&[field], move |r| *r = cleared).await
  }

  /// Read-merge-write of `keys` from `staged`. Returns the document as
  /// written.
  async fn write(&self, staged: &R, keys: &[String]) -> Result<R> {
    let current: Fields = self
      .store
      .get(R::COLLECTION, R::DOC_ID)
      .await
      .map_err(store_err)?
      .map(|d| d.fields)
      .unwrap_or_default();

    let ours = staged.to_fields()?;
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let merged = merge_shallow(current, project(&ours, &refs));

    let written = self
      .store
      .set(R::COLLECTION, R::DOC_ID, merged)
      .await
      .map_err(store_err)?;
    Ok(R::from_fields(&written.fields)?)
  }

  fn require_state(&self, state: EditorState, action: &'static str) -> Result<()> {
    if self.state != state {
      return Err(self.invalid(action));
    }
    Ok(())
  }

  fn invalid(&self, action: &'static str) -> Error {
    Error::InvalidState { action, state: self.state.name() }
  }
}

#[cfg(test)]
mod tests {
  use folio_core::{
    document::Fields,
    resource::{AboutContent, ContactInfo},
  };
  use serde_json::{Value, json};

  use super::*;
  use crate::{
    notify::Level,
    testing::{FlakyStore, notifier, store},
  };

  fn fields(v: Value) -> Fields {
    match v {
      Value::Object(m) => m,
      _ => panic!("not an object"),
    }
  }

  #[tokio::test]
  async fn missing_document_loads_as_default() {
    let s = store().await;
    let mut ed = DocumentEditor::<_, AboutContent>::new(s, notifier());
    assert_eq!(ed.state(), EditorState::Loading);
    ed.load().await;
    assert_eq!(ed.state(), EditorState::Viewing);
    assert_eq!(ed.buffer(), &AboutContent::default());
  }

  #[tokio::test]
  async fn edit_save_cycle() {
    let s = store().await;
    let n = notifier();
    let mut ed = DocumentEditor::<_, AboutContent>::new(s.clone(), n.clone());
    ed.load().await;

    ed.edit().unwrap();
    ed.update(|a| a.text = "Hello".into()).unwrap();
    ed.save().await.unwrap();

    assert_eq!(ed.state(), EditorState::Viewing);
    assert_eq!(ed.persisted().text, "Hello");
    let doc = s.get("aboutSection", "content").await.unwrap().unwrap();
    assert_eq!(doc.fields["text"], "Hello");
    assert_eq!(n.last().unwrap().level, Level::Success);
  }

  #[tokio::test]
  async fn saving_one_field_keeps_the_others() {
    let s = store().await;
    s.set(
      "aboutSection",
      "content",
      fields(json!({ "text": "old", "aboutImage": "x.png" })),
    )
    .await
    .unwrap();

    let mut ed = DocumentEditor::<_, AboutContent>::new(s.clone(), notifier()).with_fields(&["text"]);
    ed.load().await;
    ed.edit().unwrap();
    ed.update(|a| a.text = "new".into()).unwrap();
    ed.save().await.unwrap();

    let doc = s.get("aboutSection", "content").await.unwrap().unwrap();
    assert_eq!(doc.fields["text"], "new");
    assert_eq!(doc.fields["aboutImage"], "x.png");
  }

  #[tokio::test]
  async fn fields_written_elsewhere_after_load_survive() {
    let s = store().await;
    let mut text = DocumentEditor::<_, AboutContent>::new(s.clone(), notifier()).with_fields(&["text"]);
    text.load().await;

    // Another editor sets the image after this one loaded.
    s.set("aboutSection", "content", fields(json!({ "homeImage": "home.png" })))
      .await
      .unwrap();

    text.edit().unwrap();
    text.update(|a| a.text = "bio".into()).unwrap();
    text.save().await.unwrap();

    let doc = s.get("aboutSection", "content").await.unwrap().unwrap();
    assert_eq!(doc.fields["homeImage"], "home.png");
    assert_eq!(text.persisted().home_image.as_deref(), Some("home.png"));
  }

  #[tokio::test]
  async fn unknown_fields_are_preserved() {
    let s = store().await;
    s.set("contacts", "main", fields(json!({ "email": "a@b.com", "fax": "123" })))
      .await
      .unwrap();

    let mut ed = DocumentEditor::<_, ContactInfo>::new(s.clone(), notifier());
    ed.load().await;
    ed.edit().unwrap();
    ed.update(|c| c.phone = "555".into()).unwrap();
    ed.save().await.unwrap();

    let doc = s.get("contacts", "main").await.unwrap().unwrap();
    assert_eq!(doc.fields["fax"], "123");
    assert_eq!(doc.fields["phone"], "555");
    assert_eq!(doc.fields["email"], "a@b.com");
  }

  #[tokio::test]
  async fn cancel_restores_the_persisted_value() {
    let s = store().await;
    let mut ed = DocumentEditor::<_, AboutContent>::new(s, notifier());
    ed.load().await;
    ed.edit().unwrap();
    ed.update(|a| a.text = "draft".into()).unwrap();
    ed.cancel();

    assert_eq!(ed.state(), EditorState::Viewing);
    assert_eq!(ed.buffer().text, "");
  }

  #[tokio::test]
  async fn viewing_is_read_only() {
    let s = store().await;
    let mut ed = DocumentEditor::<_, AboutContent>::new(s, notifier());
    ed.load().await;
    assert!(matches!(
      ed.update(|a| a.text = "x".into()),
      Err(Error::InvalidState { action: "update", state: "viewing" })
    ));
    assert!(ed.save().await.is_err());
  }

  #[tokio::test]
  async fn second_edit_keeps_the_draft() {
    let s = store().await;
    let mut ed = DocumentEditor::<_, AboutContent>::new(s, notifier());
    ed.load().await;
    ed.edit().unwrap();
    ed.update(|a| a.text = "draft".into()).unwrap();

    ed.edit().unwrap();
    assert_eq!(ed.state(), EditorState::Editing);
    assert_eq!(ed.buffer().text, "draft");
  }

  #[tokio::test]
  async fn edit_before_load_is_rejected() {
    let s = store().await;
    let mut ed = DocumentEditor::<_, AboutContent>::new(s, notifier());
    assert!(matches!(
      ed.edit(),
      Err(Error::InvalidState { action: "edit", state: "loading" })
    ));
  }

  #[tokio::test]
  async fn failed_load_falls_back_to_default() {
    let s = FlakyStore::new().await;
    s.set("aboutSection", "content", fields(json!({ "text": "stored" })))
      .await
      .unwrap();
    s.fail_reads(true);

    let n = notifier();
    let mut ed = DocumentEditor::<_, AboutContent>::new(s, n.clone());
    ed.load().await;

    assert_eq!(ed.state(), EditorState::Viewing);
    assert_eq!(ed.buffer(), &AboutContent::default());
    assert_eq!(ed.persisted(), &AboutContent::default());
    let last = n.last().unwrap();
    assert_eq!(last.level, Level::Error);
    assert_eq!(last.message, "Failed to load aboutSection");
  }

  #[tokio::test]
  async fn failed_save_returns_to_editing_with_edits() {
    let s = FlakyStore::new().await;
    let n = notifier();
    let mut ed = DocumentEditor::<_, AboutContent>::new(s.clone(), n.clone());
    ed.load().await;
    ed.edit().unwrap();
    ed.update(|a| a.text = "unsaved".into()).unwrap();

    s.fail_writes(true);
    assert!(matches!(ed.save().await, Err(Error::Store(_))));
    assert_eq!(ed.state(), EditorState::Editing);
    assert_eq!(ed.buffer().text, "unsaved");
    assert_eq!(ed.persisted().text, "");
    let last = n.last().unwrap();
    assert_eq!(last.level, Level::Error);
    assert_eq!(last.message, "Failed to save aboutSection");

    s.fail_writes(false);
    ed.save().await.unwrap();
    assert_eq!(ed.state(), EditorState::Viewing);
    assert_eq!(ed.persisted().text, "unsaved");
  }

  #[tokio::test]
  async fn invalid_buffer_stays_in_editing() {
    use folio_core::resource::AdminProfile;

    let s = store().await;
    let n = notifier();
    let mut ed = DocumentEditor::<_, AdminProfile>::new(s.clone(), n.clone());
    ed.load().await;
    ed.edit().unwrap();
    ed.update(|p| p.email = "not-an-email".into()).unwrap();

    assert!(ed.save().await.is_err());
    assert_eq!(ed.state(), EditorState::Editing);
    assert_eq!(ed.buffer().email, "not-an-email");
    assert_eq!(n.last().unwrap().level, Level::Error);
    assert!(s.get("admin", "profile").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn save_fields_while_viewing() {
    let s = store().await;
    s.set("aboutSection", "content", fields(json!({ "text": "bio" })))
      .await
      .unwrap();

    let mut ed = DocumentEditor::<_, AboutContent>::new(s.clone(), notifier());
    ed.load().await;
    ed.save_fields(&["aboutImage"], |a| a.about_image = Some("me.png".into()))
      .await
      .unwrap();

    assert_eq!(ed.state(), EditorState::Viewing);
    assert_eq!(ed.buffer().about_image.as_deref(), Some("me.png"));
    let doc = s.get("aboutSection", "content").await.unwrap().unwrap();
    assert_eq!(doc.fields["aboutImage"], "me.png");
    assert_eq!(doc.fields["text"], "bio");
  }

  #[tokio::test]
  async fn save_fields_keeps_unsaved_edits_local() {
    let s = store().await;
    let mut ed = DocumentEditor::<_, AboutContent>::new(s.clone(), notifier());
    ed.load().await;
    ed.edit().unwrap();
    ed.update(|a| a.text = "draft".into()).unwrap();
    ed.save_fields(&["homeImage"], |a| a.home_image = Some("h.png".into()))
      .await
      .unwrap();

    assert_eq!(ed.state(), EditorState::Editing);
    assert_eq!(ed.buffer().text, "draft");
    assert_eq!(ed.buffer().home_image.as_deref(), Some("h.png"));
    let doc = s.get("aboutSection", "content").await.unwrap().unwrap();
    assert!(!doc.fields.contains_key("text"));
  }

  #[tokio::test]
  async fn clear_field_writes_null() {
    let s = store().await;
    s.set(
      "aboutSection",
      "content",
      fields(json!({ "text": "bio", "homeImage": "h.png" })),
    )
    .await
    .unwrap();

    let mut ed = DocumentEditor::<_, AboutContent>::new(s.clone(), notifier());
    ed.load().await;
    ed.clear_field("homeImage").await.unwrap();

    assert_eq!(ed.buffer().home_image, None);
    let doc = s.get("aboutSection", "content").await.unwrap().unwrap();
    assert_eq!(doc.fields["homeImage"], Value::Null);
    assert_eq!(doc.fields["text"], "bio");
  }
}
