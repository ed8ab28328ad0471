// asyncpipe/demos/saas_app/src/models/membership.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Owner,
  Admin,
  Member,
}

/// Links a user to an organization with a role. At most one per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
  pub id: Uuid,
  pub user_id: Uuid,
  pub organization_id: Uuid,
  pub role: Role,
  pub created_at: DateTime<Utc>,
}
