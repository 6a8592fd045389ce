//! Admin dashboard counters and their refresh loop.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use folio_core::{
  document::collections,
  store::{CollectionQuery, DocumentStore},
};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::{Result, error::store_err, presence::count_active_visitors};

pub const STATS_REFRESH: Duration = Duration::from_secs(60);

pub use folio_core::stats::DashboardStats;

pub async fn load_stats<S: DocumentStore>(store: &S, now: DateTime<Utc>) -> Result<DashboardStats> {
  let active_users = count_active_visitors(store, now).await?;
  let total_projects = count(store, collections::PROJECTS).await?;
  let total_skills = count(store, collections::SKILLS).await?;
  Ok(DashboardStats { active_users, total_projects, total_skills })
}

async fn count<S: DocumentStore>(store: &S, collection: &str) -> Result<usize> {
  let query = CollectionQuery::all(collection);
  Ok(store.list(&query).await.map_err(store_err)?.len())
}

/// Reloads [`DashboardStats`] on a fixed period, starting immediately. A failed
/// reload is logged and the previous figures stay in place. Dropping the
/// poller stops it.
pub struct StatsPoller {
  rx:     watch::Receiver<Option<DashboardStats>>,
  handle: JoinHandle<()>,
}

impl StatsPoller {
  pub fn spawn<S>(store: Arc<S>, period: Duration) -> Self
  where
    S: DocumentStore + 'static,
  {
    let (tx, rx) = watch::channel(None);
    let handle = tokio::spawn(async move {
      let mut interval = tokio::time::interval(period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        interval.tick().await;
        match load_stats(&*store, Utc::now()).await {
          Ok(stats) => {
            if tx.send(Some(stats)).is_err() {
              break;
            }
          }
          Err(e) => tracing::error!(error = %e, "failed to fetch dashboard stats"),
        }
      }
    });
    Self { rx, handle }
  }

  /// `None` until the first load completes.
  pub fn latest(&self) -> Option<DashboardStats> { *self.rx.borrow() }

  /// Wait for the next successful reload.
  pub async fn changed(&mut self) -> Option<DashboardStats> {
    self.rx.changed().await.ok()?;
    *self.rx.borrow_and_update()
  }
}

impl Drop for StatsPoller {
  fn drop(&mut self) { self.handle.abort(); }
}

#[cfg(test)]
mod tests {
  use folio_core::document::Fields;
  use serde_json::{Value, json};

  use super::*;
  use crate::{presence::record_heartbeat, testing::store};

  fn fields(v: Value) -> Fields {
    match v {
      Value::Object(m) => m,
      _ => panic!("not an object"),
    }
  }

  #[tokio::test]
  async fn counts_each_source() {
    let s = store().await;
    record_heartbeat(&*s, "203.0.113.7").await.unwrap();
    s.add("projects", fields(json!({ "title": "A" }))).await.unwrap();
    s.add("skills", fields(json!({ "name": "Rust" }))).await.unwrap();
    s.add("skills", fields(json!({ "name": "SQL" }))).await.unwrap();

    let stats = load_stats(&*s, Utc::now()).await.unwrap();
    assert_eq!(stats, DashboardStats { active_users: 1, total_projects: 1, total_skills: 2 });
  }

  #[tokio::test]
  async fn serializes_in_camel_case() {
    let stats = DashboardStats { active_users: 1, total_projects: 2, total_skills: 3 };
    assert_eq!(
      serde_json::to_value(stats).unwrap(),
      json!({ "activeUsers": 1, "totalProjects": 2, "totalSkills": 3 })
    );
  }

  #[tokio::test]
  async fn poller_loads_immediately_then_on_each_period() {
    let s = store().await;
    let mut poller = StatsPoller::spawn(s.clone(), Duration::from_millis(50));
    let first = poller.changed().await.unwrap();
    assert_eq!(first.total_skills, 0);

    s.add("skills", fields(json!({ "name": "Rust" }))).await.unwrap();
    let next = poller.changed().await.unwrap();
    assert_eq!(next.total_skills, 1);
    assert_eq!(poller.latest(), Some(next));
  }
}
