// asyncpipe/demos/saas_app/src/web/handlers/invite_handlers.rs

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, instrument};

use super::page_request;
use crate::errors::AppError;
use crate::pipelines::contexts::{InviteAccepted, InviteLinkRequest};
use crate::state::AppState;

#[instrument(name = "handler::accept_invite", skip(req, app_state))]
pub async fn accept_invite_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  invite_link_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let input = InviteLinkRequest {
    page: page_request(&req, &app_state),
    invite_link_id: invite_link_id.into_inner(),
  };
  let accepted: InviteAccepted = app_state.registry.run(input).await?;
  info!(organization = %accepted.organization_slug, membership_id = %accepted.membership.id, "Invite accepted.");
  Ok(
    HttpResponse::Found()
      .insert_header((header::LOCATION, format!("/organizations/{}", accepted.organization_slug)))
      .finish(),
  )
}
