//! Visitor heartbeats.

use chrono::{DateTime, Utc};
use folio_core::{
  document::{Fields, server_timestamp},
  presence::count_active,
  remote::IpLookup,
  resource::{ActiveUser, Resource},
  store::{CollectionQuery, DocumentStore},
};

use crate::{Result, collection::fetch_all, error::store_err};

/// Record a visit from the caller's public IP. Any failure is logged and
/// swallowed; returns the IP on success.
pub async fn register_visit<S, L>(store: &S, lookup: &L) -> Option<String>
where
  S: DocumentStore,
  L: IpLookup,
{
  let ip = match lookup.public_ip().await {
    Ok(ip) => ip,
    Err(e) => {
      tracing::warn!(error = %e, "public ip lookup failed");
      return None;
    }
  };
  match record_heartbeat(store, &ip).await {
    Ok(()) => Some(ip),
    Err(e) => {
      tracing::warn!(ip = %ip, error = %e, "failed to record heartbeat");
      None
    }
  }
}

/// Upsert `activeUsers/<ip>` with the store's current time.
pub async fn record_heartbeat<S: DocumentStore>(store: &S, ip: &str) -> Result<()> {
  let mut fields = Fields::new();
  fields.insert("lastSeen".to_owned(), server_timestamp());
  store
    .set(ActiveUser::COLLECTION, ip, fields)
    .await
    .map_err(store_err)?;
  tracing::debug!(ip, "heartbeat recorded");
  Ok(())
}

pub async fn count_active_visitors<S: DocumentStore>(store: &S, now: DateTime<Utc>) -> Result<usize> {
  let beats = fetch_all::<_, ActiveUser>(store, &CollectionQuery::all(ActiveUser::COLLECTION)).await?;
  Ok(count_active(&beats, now))
}
