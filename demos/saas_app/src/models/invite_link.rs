// asyncpipe/demos/saas_app/src/models/invite_link.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shareable link granting Member access to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteLink {
  pub id: Uuid,
  pub organization_id: Uuid,
  pub created_by: Uuid,
  pub is_active: bool,
  /// `None` means the link never expires.
  pub expires_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}

impl InviteLink {
  /// Whether the link can still be accepted at `now`.
  pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
    self.is_active && self.expires_at.map_or(true, |expires_at| expires_at > now)
  }
}
