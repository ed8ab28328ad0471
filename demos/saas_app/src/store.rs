// asyncpipe/demos/saas_app/src/store.rs

//! In-memory persistence for the demo. Every accessor clones records out so no
//! lock is held across an `.await` in a pipeline step.

use crate::models::{InviteLink, Membership, Organization, Role, Session, User};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{event, instrument, Level};
use uuid::Uuid;

#[derive(Default)]
struct StoreData {
  users: HashMap<Uuid, User>,
  sessions: HashMap<String, Session>,
  organizations: HashMap<Uuid, Organization>,
  memberships: Vec<Membership>,
  invite_links: HashMap<Uuid, InviteLink>,
}

#[derive(Default)]
pub struct Store {
  data: RwLock<StoreData>,
}

impl Store {
  pub fn new() -> Self {
    Self::default()
  }

  // --- Users & sessions ---

  pub async fn create_user(&self, email: &str, name: &str) -> User {
    let user = User {
      id: Uuid::new_v4(),
      email: email.to_lowercase(),
      name: name.to_string(),
      created_at: Utc::now(),
    };
    self.data.write().await.users.insert(user.id, user.clone());
    user
  }

  pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
    let email = email.trim().to_lowercase();
    self.data.read().await.users.values().find(|u| u.email == email).cloned()
  }

  pub async fn create_session(&self, user_id: Uuid) -> Session {
    let session = Session {
      token: Uuid::new_v4().simple().to_string(),
      user_id,
      created_at: Utc::now(),
    };
    self
      .data
      .write()
      .await
      .sessions
      .insert(session.token.clone(), session.clone());
    session
  }

  /// Resolves a session token to its user. Unknown tokens and tokens whose
  /// user no longer exists both yield `None`.
  pub async fn find_session_user(&self, token: &str) -> Option<User> {
    let data = self.data.read().await;
    let session = data.sessions.get(token)?;
    data.users.get(&session.user_id).cloned()
  }

  pub async fn delete_session(&self, token: &str) -> bool {
    self.data.write().await.sessions.remove(token).is_some()
  }

  // --- Organizations & memberships ---

  /// Creates an organization owned by `owner_id`.
  pub async fn create_organization(&self, slug: &str, name: &str, owner_id: Uuid) -> Organization {
    let now = Utc::now();
    let organization = Organization {
      id: Uuid::new_v4(),
      slug: slug.to_string(),
      name: name.to_string(),
      created_at: now,
    };
    let mut data = self.data.write().await;
    data.organizations.insert(organization.id, organization.clone());
    data.memberships.push(Membership {
      id: Uuid::new_v4(),
      user_id: owner_id,
      organization_id: organization.id,
      role: Role::Owner,
      created_at: now,
    });
    organization
  }

  pub async fn find_organization_by_slug(&self, slug: &str) -> Option<Organization> {
    self
      .data
      .read()
      .await
      .organizations
      .values()
      .find(|o| o.slug == slug)
      .cloned()
  }

  pub async fn find_organization(&self, id: Uuid) -> Option<Organization> {
    self.data.read().await.organizations.get(&id).cloned()
  }

  pub async fn find_membership(&self, user_id: Uuid, organization_id: Uuid) -> Option<Membership> {
    self
      .data
      .read()
      .await
      .memberships
      .iter()
      .find(|m| m.user_id == user_id && m.organization_id == organization_id)
      .cloned()
  }

  /// Adds `user_id` to the organization with `role`. Returns the existing
  /// membership unchanged if the user already belongs to it.
  pub async fn add_membership(&self, user_id: Uuid, organization_id: Uuid, role: Role) -> Membership {
    let mut data = self.data.write().await;
    if let Some(existing) = data
      .memberships
      .iter()
      .find(|m| m.user_id == user_id && m.organization_id == organization_id)
    {
      return existing.clone();
    }
    let membership = Membership {
      id: Uuid::new_v4(),
      user_id,
      organization_id,
      role,
      created_at: Utc::now(),
    };
    data.memberships.push(membership.clone());
    membership
  }

  /// Organizations `user_id` belongs to, with the user's role in each, sorted by name.
  pub async fn organizations_for_user(&self, user_id: Uuid) -> Vec<(Organization, Role)> {
    let data = self.data.read().await;
    let mut result: Vec<(Organization, Role)> = data
      .memberships
      .iter()
      .filter(|m| m.user_id == user_id)
      .filter_map(|m| data.organizations.get(&m.organization_id).map(|o| (o.clone(), m.role)))
      .collect();
    result.sort_by(|a, b| a.0.name.cmp(&b.0.name));
    result
  }

  pub async fn member_count(&self, organization_id: Uuid) -> usize {
    self
      .data
      .read()
      .await
      .memberships
      .iter()
      .filter(|m| m.organization_id == organization_id)
      .count()
  }

  // --- Invite links ---

  pub async fn create_invite_link(
    &self,
    organization_id: Uuid,
    created_by: Uuid,
    expires_at: Option<DateTime<Utc>>,
  ) -> InviteLink {
    let link = InviteLink {
      id: Uuid::new_v4(),
      organization_id,
      created_by,
      is_active: true,
      expires_at,
      created_at: Utc::now(),
    };
    self.data.write().await.invite_links.insert(link.id, link.clone());
    link
  }

  pub async fn find_invite_link(&self, id: Uuid) -> Option<InviteLink> {
    self.data.read().await.invite_links.get(&id).cloned()
  }

  pub async fn deactivate_invite_link(&self, id: Uuid) -> bool {
    match self.data.write().await.invite_links.get_mut(&id) {
      Some(link) => {
        link.is_active = false;
        true
      }
      None => false,
    }
  }

  pub async fn invite_links_for_organization(&self, organization_id: Uuid) -> Vec<InviteLink> {
    let mut links: Vec<InviteLink> = self
      .data
      .read()
      .await
      .invite_links
      .values()
      .filter(|l| l.organization_id == organization_id)
      .cloned()
      .collect();
    links.sort_by_key(|l| l.created_at);
    links
  }

  // --- Seeding ---

  /// Populates the store with a small demo tenant:
  /// `ada@example.com` owns "acme", `grace@example.com` administers it,
  /// `linus@example.com` is a plain member, and `margaret@example.com`
  /// belongs to nothing. Acme gets one open invite link.
  #[instrument(name = "Store::seed_demo_data", skip(self))]
  pub async fn seed_demo_data(&self, invite_link_ttl_days: i64) {
    let ada = self.create_user("ada@example.com", "Ada Lovelace").await;
    let grace = self.create_user("grace@example.com", "Grace Hopper").await;
    let linus = self.create_user("linus@example.com", "Linus Torvalds").await;
    self.create_user("margaret@example.com", "Margaret Hamilton").await;

    let acme = self.create_organization("acme", "Acme Corp", ada.id).await;
    self.add_membership(grace.id, acme.id, Role::Admin).await;
    self.add_membership(linus.id, acme.id, Role::Member).await;
    self.create_organization("globex", "Globex", grace.id).await;

    let link = self
      .create_invite_link(acme.id, ada.id, Some(Utc::now() + Duration::days(invite_link_ttl_days)))
      .await;

    event!(Level::INFO, acme_invite_link = %link.id, "Demo data seeded.");
  }
}
