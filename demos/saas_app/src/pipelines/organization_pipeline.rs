// asyncpipe/demos/saas_app/src/pipelines/organization_pipeline.rs

use crate::errors::AppError;
use crate::models::Role;
use crate::pipelines::contexts::{
  Authenticated, DashboardPage, InOrganization, InviteLinkSummary, OrganizationRequest, OrganizationSummary,
  OrganizationsPage, PageRequest, SettingsPage,
};
use crate::pipelines::middleware::{require_role, require_user_is_authenticated, with_organization_membership};
use crate::state::AppState;
use crate::store::Store;
use asyncpipe::{pipe, step_fn, PipelineRegistry, Signal, Step};
use std::sync::Arc;
use tracing::{event, Level};

/// Roles allowed on organization settings.
pub const SETTINGS_ROLES: &[Role] = &[Role::Owner, Role::Admin];

/// `GET /organizations`: every organization the signed-in user belongs to.
pub fn organizations_page_pipeline(store: Arc<Store>) -> impl Step<PageRequest, Output = OrganizationsPage, Error = Signal> {
  let list_store = store.clone();
  pipe![
    require_user_is_authenticated::<PageRequest>(store),
    step_fn(move |ctx: Authenticated<PageRequest>| {
      let store = list_store.clone();
      async move {
        let organizations = store
          .organizations_for_user(ctx.user.id)
          .await
          .into_iter()
          .map(|(organization, role)| OrganizationSummary {
            slug: organization.slug,
            name: organization.name,
            role,
          })
          .collect();
        Ok::<_, Signal>(OrganizationsPage {
          user: ctx.user,
          organizations,
        })
      }
    }),
  ]
}

/// `GET /organizations/{slug}`: visible to any member.
pub fn dashboard_page_pipeline(
  store: Arc<Store>,
) -> impl Step<OrganizationRequest, Output = DashboardPage, Error = Signal> {
  let count_store = store.clone();
  pipe![
    require_user_is_authenticated::<OrganizationRequest>(store.clone()),
    with_organization_membership(store),
    step_fn(move |ctx: InOrganization| {
      let store = count_store.clone();
      async move {
        let member_count = store.member_count(ctx.organization.id).await;
        Ok::<_, Signal>(DashboardPage {
          role: ctx.membership.role,
          organization: ctx.organization,
          member_count,
        })
      }
    }),
  ]
}

/// `GET /organizations/{slug}/settings`: owners and admins only.
pub fn settings_page_pipeline(
  store: Arc<Store>,
  app_base_url: String,
) -> impl Step<OrganizationRequest, Output = SettingsPage, Error = Signal> {
  let links_store = store.clone();
  pipe![
    require_user_is_authenticated::<OrganizationRequest>(store.clone()),
    with_organization_membership(store),
    require_role(SETTINGS_ROLES),
    step_fn(move |ctx: InOrganization| {
      let store = links_store.clone();
      let app_base_url = app_base_url.clone();
      async move {
        let invite_links = store
          .invite_links_for_organization(ctx.organization.id)
          .await
          .into_iter()
          .map(|link| InviteLinkSummary {
            url: format!("{}/invite/{}", app_base_url.trim_end_matches('/'), link.id),
            id: link.id,
            is_active: link.is_active,
            expires_at: link.expires_at,
          })
          .collect();
        Ok::<_, Signal>(SettingsPage {
          role: ctx.membership.role,
          organization: ctx.organization,
          invite_links,
        })
      }
    }),
  ]
}

/// Registers the organization page pipelines with the registry.
pub fn register_organization_pipelines(registry: &Arc<PipelineRegistry<AppError>>, app_state: &AppState) {
  registry.register::<PageRequest, _>(organizations_page_pipeline(app_state.store.clone()));
  registry.register::<OrganizationRequest, _>(dashboard_page_pipeline(app_state.store.clone()));
  registry.register::<OrganizationRequest, _>(settings_page_pipeline(
    app_state.store.clone(),
    app_state.config.app_base_url.clone(),
  ));
  event!(Level::DEBUG, "Organization pipelines registered.");
}
