//! Handlers for `/dashboard` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dashboard/active-users` | Directory users flagged active |
//! | `GET`  | `/dashboard/stats` | Basic auth; counts heartbeats, projects, skills |

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use folio_core::{
  resource::{DirectoryUser, Record, Resource},
  stats::DashboardStats,
  store::{CollectionQuery, DocumentStore},
};
use serde::Serialize;

use crate::{auth::AdminAuth, error::ApiError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUsersResponse {
  pub success:      bool,
  pub active_users: Vec<Record<DirectoryUser>>,
}

/// `GET /dashboard/active-users`
pub async fn active_users<S>(State(store): State<Arc<S>>) -> Result<Json<ActiveUsersResponse>, ApiError>
where
  S: DocumentStore,
{
  let users: Vec<Record<DirectoryUser>> = folio_sync::collection::fetch_all(
    &*store,
    &CollectionQuery::all(DirectoryUser::COLLECTION),
  )
  .await
  .map_err(ApiError::internal("Error fetching active users"))?;

  let active_users = users.into_iter().filter(|u| u.value.is_active).collect();
  Ok(Json(ActiveUsersResponse { success: true, active_users }))
}

/// `GET /dashboard/stats`
pub async fn stats<S>(
  AdminAuth(_): AdminAuth,
  State(store): State<Arc<S>>,
) -> Result<Json<DashboardStats>, ApiError>
where
  S: DocumentStore + 'static,
{
  let stats = folio_sync::dashboard::load_stats(&*store, Utc::now())
    .await
    .map_err(ApiError::internal("Error fetching dashboard stats"))?;
  Ok(Json(stats))
}
