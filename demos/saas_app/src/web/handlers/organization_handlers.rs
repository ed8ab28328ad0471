// asyncpipe/demos/saas_app/src/web/handlers/organization_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;

use super::page_request;
use crate::errors::AppError;
use crate::pipelines::contexts::{DashboardPage, OrganizationRequest, OrganizationsPage, SettingsPage};
use crate::state::AppState;

#[instrument(name = "handler::list_organizations", skip_all)]
pub async fn list_organizations_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let page: OrganizationsPage = app_state.registry.run(page_request(&req, &app_state)).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::organization_dashboard", skip(req, app_state))]
pub async fn dashboard_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  organization_slug: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let input = OrganizationRequest {
    page: page_request(&req, &app_state),
    organization_slug: organization_slug.into_inner(),
  };
  let page: DashboardPage = app_state.registry.run(input).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::organization_settings", skip(req, app_state))]
pub async fn settings_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  organization_slug: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let input = OrganizationRequest {
    page: page_request(&req, &app_state),
    organization_slug: organization_slug.into_inner(),
  };
  let page: SettingsPage = app_state.registry.run(input).await?;
  Ok(HttpResponse::Ok().json(page))
}
