//! HTTP server for Folio.
//!
//! Mounts the JSON API under `/api` over any [`DocumentStore`] and seeds the
//! admin credentials from configuration on first start.

pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, routing::get};
use folio_core::{
  resource::{AdminCredentials, Resource, Singleton},
  store::DocumentStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FOLIO_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Admin email written on first start if no credentials exist yet.
  #[serde(default)]
  pub admin_email:         Option<String>,
  /// Argon2 PHC string for the admin password, see `--hash-password`.
  #[serde(default)]
  pub admin_password_hash: Option<String>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

pub fn router<S>(store: Arc<S>) -> Router
where
  S: DocumentStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", folio_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Admin bootstrap ─────────────────────────────────────────────────────────

/// Write `admin/credentials` from `config` unless credentials already exist.
/// Returns whether anything was written.
pub async fn bootstrap_admin<S>(store: &S, config: &ServerConfig) -> Result<bool, Error>
where
  S: DocumentStore,
{
  let (Some(email), Some(hash)) = (&config.admin_email, &config.admin_password_hash) else {
    return Ok(false);
  };
  argon2::PasswordHash::new(hash).map_err(|e| Error::InvalidHash(e.to_string()))?;

  if folio_sync::session::load_credentials(store).await?.is_some() {
    tracing::debug!("admin credentials already present; leaving them alone");
    return Ok(false);
  }

  let creds = AdminCredentials { email: email.clone(), password_hash: hash.clone() };
  store
    .set(AdminCredentials::COLLECTION, AdminCredentials::DOC_ID, creds.to_fields()?)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  tracing::info!(email = %email, "seeded admin credentials");
  Ok(true)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use folio_core::credentials::hash_password;
  use folio_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn store() -> Arc<SqliteStore> { Arc::new(SqliteStore::open_in_memory().await.unwrap()) }

  fn config(email: Option<&str>, hash: Option<String>) -> ServerConfig {
    ServerConfig {
      host:                "127.0.0.1".to_string(),
      port:                5000,
      store_path:          PathBuf::from(":memory:"),
      admin_email:         email.map(str::to_owned),
      admin_password_hash: hash,
    }
  }

  #[tokio::test]
  async fn health_is_ok() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = router(store().await).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn api_is_nested_under_api() {
    let req = Request::builder()
      .uri("/api/dashboard/active-users")
      .body(Body::empty())
      .unwrap();
    let resp = router(store().await).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
      .uri("/dashboard/active-users")
      .body(Body::empty())
      .unwrap();
    let resp = router(store().await).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn bootstrap_seeds_once() {
    let s = store().await;
    let cfg = config(Some("admin@example.com"), Some(hash_password("secret-1").unwrap()));
    assert!(bootstrap_admin(&*s, &cfg).await.unwrap());
    assert!(
      folio_sync::session::authenticate(&*s, "admin@example.com", "secret-1")
        .await
        .is_ok()
    );

    let other = config(Some("other@example.com"), Some(hash_password("x").unwrap()));
    assert!(!bootstrap_admin(&*s, &other).await.unwrap());
    assert!(
      folio_sync::session::authenticate(&*s, "admin@example.com", "secret-1")
        .await
        .is_ok()
    );
  }

  #[tokio::test]
  async fn bootstrap_without_config_does_nothing() {
    let s = store().await;
    assert!(!bootstrap_admin(&*s, &config(None, None)).await.unwrap());
    assert!(folio_sync::session::load_credentials(&*s).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn plaintext_password_in_config_is_rejected() {
    let s = store().await;
    let cfg = config(Some("admin@example.com"), Some("secret-1".to_owned()));
    assert!(matches!(bootstrap_admin(&*s, &cfg).await, Err(Error::InvalidHash(_))));
  }
}
