//! The public contact form and the admin contact-details editor.

use folio_core::{
  document::server_timestamp,
  remote::{Geocoder, PlaceSuggestion},
  resource::{ContactInfo, ContactMessage, Resource},
  store::DocumentStore,
};

use crate::{Result, editor::DocumentEditor, error::store_err, notify::Notifier};

/// Location queries this short are not sent to the geocoder.
pub const MIN_LOCATION_QUERY: usize = 3;

pub type ContactEditor<S> = DocumentEditor<S, ContactInfo>;

/// Validate a contact-form submission and append it to the inbox with the
/// store's timestamp. Returns the new message id.
pub async fn submit_message<S: DocumentStore>(
  store: &S,
  notifier: &dyn Notifier,
  name: &str,
  email: &str,
  message: &str,
) -> Result<String> {
  let draft = ContactMessage {
    name:      name.trim().to_owned(),
    email:     email.trim().to_owned(),
    message:   message.trim().to_owned(),
    timestamp: None,
  };
  if let Err(e) = draft.validate() {
    let shown = if draft.name.is_empty() || draft.email.is_empty() || draft.message.is_empty() {
      "Please fill in all required fields."
    } else {
      "Please enter a valid email."
    };
    notifier.error(shown);
    return Err(e.into());
  }

  let mut fields = draft.to_fields()?;
  fields.insert("timestamp".to_owned(), server_timestamp());
  match store.add(ContactMessage::COLLECTION, fields).await {
    Ok(doc) => {
      notifier.success("Message sent successfully!");
      Ok(doc.id)
    }
    Err(e) => {
      tracing::error!(error = %e, "failed to store contact message");
      notifier.error("Failed to send message. Please try again.");
      Err(store_err(e))
    }
  }
}

/// Place suggestions for a partial location. Short queries and geocoder
/// failures yield no suggestions.
pub async fn suggest_locations<G: Geocoder>(
  geocoder: &G,
  notifier: &dyn Notifier,
  query: &str,
) -> Vec<PlaceSuggestion> {
  let query = query.trim();
  if query.chars().count() < MIN_LOCATION_QUERY {
    return Vec::new();
  }
  match geocoder.suggest(query).await {
    Ok(places) => places,
    Err(e) => {
      tracing::warn!(query, error = %e, "location lookup failed");
      notifier.error("Failed to fetch location suggestions");
      Vec::new()
    }
  }
}

/// Adopt a suggestion into the contact details being edited.
pub fn pick_location<S: DocumentStore>(
  editor: &mut ContactEditor<S>,
  place: &PlaceSuggestion,
) -> Result<()> {
  editor.update(|info| info.apply_place(place))
}
