// asyncpipe/demos/saas_app/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{auth_handlers, invite_handlers, organization_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    // Visitors
    .service(
      web::resource("/login")
        .route(web::get().to(auth_handlers::login_page_handler))
        .route(web::post().to(auth_handlers::login_handler)),
    )
    .route("/logout", web::post().to(auth_handlers::logout_handler))
    // Signed-in users
    .service(
      web::scope("/organizations")
        .route("", web::get().to(organization_handlers::list_organizations_handler))
        .route(
          "/{organizationSlug}",
          web::get().to(organization_handlers::dashboard_handler),
        )
        .route(
          "/{organizationSlug}/settings",
          web::get().to(organization_handlers::settings_handler),
        ),
    )
    .route("/invite/{inviteLinkId}", web::get().to(invite_handlers::accept_invite_handler));
}
