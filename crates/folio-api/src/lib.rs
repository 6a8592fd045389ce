//! JSON REST API for Folio.
//!
//! Exposes an axum [`Router`] backed by any [`folio_core::store::DocumentStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", folio_api::api_router(store.clone()))
//! ```

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod messages;
pub mod presence;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use folio_core::store::DocumentStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DocumentStore + 'static,
{
  Router::new()
    // Dashboard
    .route("/dashboard/active-users", get(dashboard::active_users::<S>))
    .route("/dashboard/stats", get(dashboard::stats::<S>))
    // Admin
    .route("/admin/login", post(admin::login::<S>))
    // Public site
    .route("/messages", post(messages::create::<S>))
    .route("/presence", post(presence::heartbeat::<S>))
    .with_state(store)
}
