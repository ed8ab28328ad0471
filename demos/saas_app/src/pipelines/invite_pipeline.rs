// asyncpipe/demos/saas_app/src/pipelines/invite_pipeline.rs

use crate::errors::AppError;
use crate::models::Role;
use crate::pipelines::contexts::{Authenticated, InviteAccepted, InviteLinkRequest, WithInviteLink};
use crate::pipelines::middleware::require_user_is_authenticated;
use crate::state::AppState;
use crate::store::Store;
use asyncpipe::{pipe, step_fn, PipelineRegistry, Signal, Step};
use chrono::Utc;
use std::sync::Arc;
use tracing::{event, instrument, Level};
use uuid::Uuid;

/// Finds the invite link and its organization. Malformed ids, unknown links,
/// deactivated links and expired links all answer 404.
pub fn load_invite_link(
  store: Arc<Store>,
) -> impl Step<Authenticated<InviteLinkRequest>, Output = WithInviteLink, Error = Signal> {
  step_fn(move |ctx: Authenticated<InviteLinkRequest>| {
    let store = store.clone();
    async move {
      let not_found = || Signal::not_found("Invite link not found");
      let link_id = Uuid::parse_str(&ctx.request.invite_link_id).map_err(|_| not_found())?;
      let invite_link = store.find_invite_link(link_id).await.ok_or_else(not_found)?;
      if !invite_link.is_usable_at(Utc::now()) {
        event!(Level::INFO, invite_link = %invite_link.id, "Invite link is deactivated or expired.");
        return Err(not_found());
      }
      let organization = store
        .find_organization(invite_link.organization_id)
        .await
        .ok_or_else(not_found)?;
      Ok::<_, Signal>(WithInviteLink {
        user: ctx.user,
        invite_link,
        organization,
      })
    }
  })
}

/// Grants Member access. Existing members are sent straight to the dashboard.
pub fn accept_invite_link(store: Arc<Store>) -> impl Step<WithInviteLink, Output = InviteAccepted, Error = Signal> {
  step_fn(move |ctx: WithInviteLink| {
    let store = store.clone();
    async move { accept(&store, ctx).await }
  })
}

#[instrument(name = "invite::accept", skip_all, fields(organization = %ctx.organization.slug, user_id = %ctx.user.id))]
async fn accept(store: &Store, ctx: WithInviteLink) -> Result<InviteAccepted, Signal> {
  let dashboard = format!("/organizations/{}", ctx.organization.slug);
  if store.find_membership(ctx.user.id, ctx.organization.id).await.is_some() {
    event!(Level::DEBUG, "Already a member, redirecting to dashboard.");
    return Err(Signal::redirect(dashboard));
  }
  let membership = store.add_membership(ctx.user.id, ctx.organization.id, Role::Member).await;
  event!(Level::INFO, "Membership created from invite link.");
  Ok(InviteAccepted {
    organization_slug: ctx.organization.slug,
    membership,
  })
}

/// `GET /invite/{id}`.
pub fn accept_invite_pipeline(
  store: Arc<Store>,
) -> impl Step<InviteLinkRequest, Output = InviteAccepted, Error = Signal> {
  pipe![
    require_user_is_authenticated::<InviteLinkRequest>(store.clone()),
    load_invite_link(store.clone()),
    accept_invite_link(store),
  ]
}

pub fn register_invite_pipelines(registry: &Arc<PipelineRegistry<AppError>>, app_state: &AppState) {
  registry.register::<InviteLinkRequest, _>(accept_invite_pipeline(app_state.store.clone()));
  event!(Level::DEBUG, "Invite pipelines registered.");
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pipelines::contexts::PageRequest;
  use chrono::Duration;

  fn invite_request(link_id: impl ToString, session_token: Option<String>) -> InviteLinkRequest {
    let invite_link_id = link_id.to_string();
    InviteLinkRequest {
      page: PageRequest {
        path: format!("/invite/{}", invite_link_id),
        session_token,
      },
      invite_link_id,
    }
  }

  async fn setup() -> (Arc<Store>, Uuid, Uuid) {
    let store = Arc::new(Store::new());
    store.seed_demo_data(7).await;
    let acme = store.find_organization_by_slug("acme").await.unwrap();
    let link = store.invite_links_for_organization(acme.id).await.remove(0);
    (store, acme.id, link.id)
  }

  async fn session_for(store: &Store, email: &str) -> String {
    let user = store.find_user_by_email(email).await.unwrap();
    store.create_session(user.id).await.token
  }

  #[tokio::test]
  async fn anonymous_visitor_is_sent_to_login() {
    let (store, _, link_id) = setup().await;
    let err = accept_invite_pipeline(store)
      .call(invite_request(link_id, None))
      .await
      .unwrap_err();
    assert_eq!(err.location(), Some(format!("/login?redirectTo=%2Finvite%2F{}", link_id).as_str()));
  }

  #[tokio::test]
  async fn new_user_becomes_member() {
    let (store, acme_id, link_id) = setup().await;
    let token = session_for(&store, "margaret@example.com").await;

    let accepted = accept_invite_pipeline(store.clone())
      .call(invite_request(link_id, Some(token)))
      .await
      .unwrap();
    assert_eq!(accepted.organization_slug, "acme");
    assert_eq!(accepted.membership.role, Role::Member);
    assert_eq!(store.member_count(acme_id).await, 4);
  }

  #[tokio::test]
  async fn existing_member_is_redirected_to_dashboard() {
    let (store, acme_id, link_id) = setup().await;
    let token = session_for(&store, "grace@example.com").await;

    let err = accept_invite_pipeline(store.clone())
      .call(invite_request(link_id, Some(token)))
      .await
      .unwrap_err();
    assert_eq!(err.location(), Some("/organizations/acme"));
    assert_eq!(store.member_count(acme_id).await, 3);
  }

  #[tokio::test]
  async fn unusable_links_are_404() {
    let (store, acme_id, link_id) = setup().await;
    let token = session_for(&store, "margaret@example.com").await;
    let ada = store.find_user_by_email("ada@example.com").await.unwrap();
    let expired = store
      .create_invite_link(acme_id, ada.id, Some(Utc::now() - Duration::days(1)))
      .await;
    assert!(store.deactivate_invite_link(link_id).await);
    let pipeline = accept_invite_pipeline(store.clone());

    for id in [link_id.to_string(), expired.id.to_string(), Uuid::new_v4().to_string(), "garbage".to_string()] {
      let err = pipeline.call(invite_request(id, Some(token.clone()))).await.unwrap_err();
      assert_eq!(err.status(), 404);
    }
    assert_eq!(store.member_count(acme_id).await, 3);
  }
}
