// asyncpipe/demos/saas_app/src/models/organization.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
  pub id: Uuid,
  /// URL-safe identifier, unique across organizations.
  pub slug: String,
  pub name: String,
  pub created_at: DateTime<Utc>,
}
