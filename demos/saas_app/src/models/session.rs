// asyncpipe/demos/saas_app/src/models/session.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
  #[serde(skip_serializing)] // Never echo the token back
  pub token: String,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}
