// asyncpipe/demos/saas_app/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod invite_handlers;
pub mod organization_handlers;

use crate::pipelines::contexts::PageRequest;
use crate::state::AppState;
use actix_web::HttpRequest;

/// The pipeline input every page starts from: the path and the session cookie.
pub(crate) fn page_request(req: &HttpRequest, app_state: &AppState) -> PageRequest {
  PageRequest {
    path: req.path().to_string(),
    session_token: req
      .cookie(&app_state.config.session_cookie_name)
      .map(|cookie| cookie.value().to_string())
      .filter(|token| !token.is_empty()),
  }
}
