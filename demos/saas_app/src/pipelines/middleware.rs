// asyncpipe/demos/saas_app/src/pipelines/middleware.rs

//! Reusable request-guard steps. Each one either hands a richer context to the
//! next step or halts the request with a [`Signal`].

use crate::models::Role;
use crate::pipelines::contexts::{Authenticated, InOrganization, OrganizationRequest, RequestInfo};
use crate::store::Store;
use asyncpipe::{step_fn, sync_step, Signal, Step};
use std::sync::Arc;
use tracing::{event, Level};

/// Where anonymous visitors are sent, remembering the page they asked for.
///
/// The path is form-encoded so it reads back intact through `web::Query`.
pub fn login_redirect(path: &str) -> String {
  match serde_urlencoded::to_string(&[("redirectTo", path)]) {
    Ok(query) => format!("/login?{}", query),
    Err(e) => {
      event!(Level::WARN, error = %e, "Could not encode login return path, dropping it.");
      "/login".to_string()
    }
  }
}

/// Resolves the session cookie to a user, or redirects to the login page.
pub fn require_user_is_authenticated<R>(store: Arc<Store>) -> impl Step<R, Output = Authenticated<R>, Error = Signal>
where
  R: RequestInfo,
{
  step_fn(move |request: R| {
    let store = store.clone();
    async move {
      let token = request.page().session_token.clone();
      let user = match token {
        Some(token) => store.find_session_user(&token).await,
        None => None,
      };
      match user {
        Some(user) => {
          event!(Level::DEBUG, user_id = %user.id, "Request authenticated.");
          Ok(Authenticated { request, user })
        }
        None => {
          event!(Level::DEBUG, path = %request.page().path, "Anonymous request, redirecting to login.");
          Err(Signal::redirect(login_redirect(&request.page().path)))
        }
      }
    }
  })
}

/// Sends signed-in users away from pages meant for visitors (login, signup).
pub fn require_anonymous<R>(store: Arc<Store>) -> impl Step<R, Output = R, Error = Signal>
where
  R: RequestInfo,
{
  step_fn(move |request: R| {
    let store = store.clone();
    async move {
      let token = request.page().session_token.clone();
      if let Some(token) = token {
        if store.find_session_user(&token).await.is_some() {
          return Err(Signal::redirect("/organizations"));
        }
      }
      Ok(request)
    }
  })
}

/// Loads the organization named in the URL and the caller's membership in it.
///
/// Unknown organizations and organizations the caller does not belong to both
/// answer 404, so slugs cannot be probed.
pub fn with_organization_membership(
  store: Arc<Store>,
) -> impl Step<Authenticated<OrganizationRequest>, Output = InOrganization, Error = Signal> {
  step_fn(move |ctx: Authenticated<OrganizationRequest>| {
    let store = store.clone();
    async move {
      let Authenticated { request, user } = ctx;
      let organization = store
        .find_organization_by_slug(&request.organization_slug)
        .await
        .ok_or_else(|| Signal::not_found("Organization not found"))?;
      let membership = match store.find_membership(user.id, organization.id).await {
        Some(membership) => membership,
        None => {
          event!(
            Level::INFO,
            user_id = %user.id,
            organization = %organization.slug,
            "Non-member asked for an organization page."
          );
          return Err(Signal::not_found("Organization not found"));
        }
      };
      Ok::<_, Signal>(InOrganization {
        request,
        user,
        organization,
        membership,
      })
    }
  })
}

/// Lets the request through only if the caller's role is in `allowed`.
pub fn require_role(allowed: &'static [Role]) -> impl Step<InOrganization, Output = InOrganization, Error = Signal> {
  sync_step(move |ctx: InOrganization| {
    if allowed.contains(&ctx.membership.role) {
      Ok(ctx)
    } else {
      event!(Level::INFO, role = ?ctx.membership.role, "Role not allowed for this page.");
      Err(Signal::forbidden("You do not have permission to view this page"))
    }
  })
}
