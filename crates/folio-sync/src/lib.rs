//! Client-side synchronisation between the document store and editable local
//! state.
//!
//! Every admin editor follows the same shape: load on mount, edit a local
//! buffer, save by merging back into the remote document, and report the
//! outcome through a [`Notifier`](notify::Notifier). This crate implements
//! that shape once, generically over [`folio_core::resource::Resource`]:
//!
//! - [`editor::DocumentEditor`] for singleton documents,
//! - [`collection::CollectionEditor`] for collection-backed lists,
//! - [`inbox::MessageInbox`] for the live message feed,
//! - [`carousel`] and [`images`] for image lists and their timers.

pub mod carousel;
pub mod collection;
pub mod contact;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod images;
pub mod inbox;
pub mod notify;
pub mod presence;
pub mod profile;
pub mod session;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod testing;
