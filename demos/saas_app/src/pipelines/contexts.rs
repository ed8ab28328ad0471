// asyncpipe/demos/saas_app/src/pipelines/contexts.rs

//! Request contexts threaded through the pipelines, and the page records they
//! produce. Each middleware step turns one context into a richer one, so a
//! handler can only reach `user` or `membership` after the step that proves it.

use crate::models::{InviteLink, Membership, Organization, Role, User};
use serde::Serialize;
use uuid::Uuid;

// --- Inputs built by the web layer ---

/// What every page request carries before any middleware has run.
#[derive(Debug, Clone)]
pub struct PageRequest {
  pub path: String,
  pub session_token: Option<String>,
}

/// Implemented by every request context, so session middleware can run on any
/// of them.
pub trait RequestInfo: Send + 'static {
  fn page(&self) -> &PageRequest;
}

impl RequestInfo for PageRequest {
  fn page(&self) -> &PageRequest {
    self
  }
}

#[derive(Debug, Clone)]
pub struct OrganizationRequest {
  pub page: PageRequest,
  pub organization_slug: String,
}

impl RequestInfo for OrganizationRequest {
  fn page(&self) -> &PageRequest {
    &self.page
  }
}

#[derive(Debug, Clone)]
pub struct InviteLinkRequest {
  pub page: PageRequest,
  pub invite_link_id: String,
}

impl RequestInfo for InviteLinkRequest {
  fn page(&self) -> &PageRequest {
    &self.page
  }
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
  pub page: PageRequest,
  pub redirect_to: Option<String>,
}

impl RequestInfo for LoginRequest {
  fn page(&self) -> &PageRequest {
    &self.page
  }
}

#[derive(Debug, Clone)]
pub struct LoginSubmission {
  pub page: PageRequest,
  pub email: String,
  pub redirect_to: Option<String>,
}

impl RequestInfo for LoginSubmission {
  fn page(&self) -> &PageRequest {
    &self.page
  }
}

// --- Contexts added by middleware ---

/// `R` plus the signed-in user.
#[derive(Debug, Clone)]
pub struct Authenticated<R> {
  pub request: R,
  pub user: User,
}

/// An authenticated organization request plus the organization and the
/// caller's membership in it.
#[derive(Debug, Clone)]
pub struct InOrganization {
  pub request: OrganizationRequest,
  pub user: User,
  pub organization: Organization,
  pub membership: Membership,
}

/// An authenticated invite request plus the link and its organization.
#[derive(Debug, Clone)]
pub struct WithInviteLink {
  pub user: User,
  pub invite_link: InviteLink,
  pub organization: Organization,
}

// --- Pipeline outputs ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
  pub slug: String,
  pub name: String,
  pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationsPage {
  pub user: User,
  pub organizations: Vec<OrganizationSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPage {
  pub organization: Organization,
  pub role: Role,
  pub member_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPage {
  pub organization: Organization,
  pub role: Role,
  pub invite_links: Vec<InviteLinkSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteLinkSummary {
  pub id: Uuid,
  pub url: String,
  pub is_active: bool,
  pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
  pub redirect_to: Option<String>,
}

/// A new session and where to send the browser next.
#[derive(Debug, Clone)]
pub struct SessionIssued {
  pub session_token: String,
  pub redirect_to: String,
}

/// Membership granted through an invite link.
#[derive(Debug, Clone)]
pub struct InviteAccepted {
  pub organization_slug: String,
  pub membership: Membership,
}
