//! Dashboard counters, shared by the sync layer, the REST API and its client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  pub active_users:   usize,
  pub total_projects: usize,
  pub total_skills:   usize,
}
