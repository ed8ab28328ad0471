// asyncpipe/demos/saas_app/src/web/handlers/auth_handlers.rs

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};

use super::page_request;
use crate::errors::AppError;
use crate::pipelines::contexts::{LoginPage, LoginRequest, LoginSubmission, SessionIssued};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
  pub redirect_to: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
  pub email: String,
  pub redirect_to: Option<String>,
}

#[instrument(name = "handler::login_page", skip_all)]
pub async fn login_page_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  query: web::Query<LoginQuery>,
) -> Result<HttpResponse, AppError> {
  let input = LoginRequest {
    page: page_request(&req, &app_state),
    redirect_to: query.into_inner().redirect_to,
  };
  let page: LoginPage = app_state.registry.run(input).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::login", skip_all)]
pub async fn login_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let LoginPayload { email, redirect_to } = payload.into_inner();
  let input = LoginSubmission {
    page: page_request(&req, &app_state),
    email,
    redirect_to,
  };
  let issued: SessionIssued = app_state.registry.run(input).await?;
  info!(redirect_to = %issued.redirect_to, "Signed in.");

  let cookie = Cookie::build(app_state.config.session_cookie_name.clone(), issued.session_token)
    .path("/")
    .http_only(true)
    .finish();
  Ok(
    HttpResponse::SeeOther()
      .cookie(cookie)
      .insert_header((header::LOCATION, issued.redirect_to))
      .finish(),
  )
}

#[instrument(name = "handler::logout", skip_all)]
pub async fn logout_handler(req: HttpRequest, app_state: web::Data<AppState>) -> HttpResponse {
  if let Some(token) = page_request(&req, &app_state).session_token {
    app_state.store.delete_session(&token).await;
  }
  let mut cookie = Cookie::new(app_state.config.session_cookie_name.clone(), "");
  cookie.set_path("/");
  cookie.make_removal();
  HttpResponse::SeeOther()
    .cookie(cookie)
    .insert_header((header::LOCATION, "/login"))
    .finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::pipelines::register_all_pipelines;
  use crate::store::Store;
  use crate::web::configure_app_routes;
  use actix_web::{http::StatusCode, test, App};
  use asyncpipe::PipelineRegistry;
  use std::sync::Arc;

  async fn seeded_state() -> AppState {
    let store = Arc::new(Store::new());
    store.seed_demo_data(7).await;
    let registry = Arc::new(PipelineRegistry::<AppError>::new());
    let app_state = AppState {
      store,
      registry: registry.clone(),
      config: Arc::new(AppConfig::default()),
    };
    register_all_pipelines(&registry, &app_state);
    app_state
  }

  fn location(resp: &actix_web::dev::ServiceResponse) -> Option<&str> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
  }

  #[actix_web::test]
  async fn session_token_comes_from_cookie_and_empty_cookie_is_ignored() {
    let app_state = seeded_state().await;

    let with_cookie = test::TestRequest::get()
      .uri("/organizations/acme")
      .cookie(Cookie::new("session", "abc123"))
      .to_http_request();
    let page = page_request(&with_cookie, &app_state);
    assert_eq!(page.path, "/organizations/acme");
    assert_eq!(page.session_token.as_deref(), Some("abc123"));

    let empty_cookie = test::TestRequest::get()
      .uri("/organizations")
      .cookie(Cookie::new("session", ""))
      .to_http_request();
    assert_eq!(page_request(&empty_cookie, &app_state).session_token, None);

    let other_cookie = test::TestRequest::get()
      .uri("/organizations")
      .cookie(Cookie::new("theme", "dark"))
      .to_http_request();
    assert_eq!(page_request(&other_cookie, &app_state).session_token, None);
  }

  #[actix_web::test]
  async fn login_sets_session_cookie_and_redirects() {
    let app_state = seeded_state().await;
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(app_state.clone()))
        .configure(configure_app_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/login")
      .set_json(serde_json::json!({ "email": "ada@example.com", "redirectTo": "/organizations/acme" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/organizations/acme"));

    let cookie = resp
      .response()
      .cookies()
      .find(|c| c.name() == "session")
      .expect("login should set the session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    let user = app_state.store.find_session_user(cookie.value()).await.unwrap();
    assert_eq!(user.email, "ada@example.com");

    // The cookie opens the protected page.
    let req = test::TestRequest::get()
      .uri("/organizations/acme")
      .cookie(Cookie::new("session", cookie.value().to_string()))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  }

  #[actix_web::test]
  async fn anonymous_page_round_trips_return_path_through_login_page() {
    let app_state = seeded_state().await;
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(app_state))
        .configure(configure_app_routes),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/organizations/acme").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let login_url = location(&resp).unwrap().to_string();

    let resp = test::call_service(&app, test::TestRequest::get().uri(&login_url).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["redirectTo"], "/organizations/acme");
  }

  #[actix_web::test]
  async fn logout_removes_session_and_cookie() {
    let app_state = seeded_state().await;
    let ada = app_state.store.find_user_by_email("ada@example.com").await.unwrap();
    let token = app_state.store.create_session(ada.id).await.token;
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(app_state.clone()))
        .configure(configure_app_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/logout")
      .cookie(Cookie::new("session", token.clone()))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/login"));

    let removal = resp
      .response()
      .cookies()
      .find(|c| c.name() == "session")
      .expect("logout should clear the session cookie");
    assert_eq!(removal.value(), "");
    assert_eq!(app_state.store.find_session_user(&token).await, None);
  }
}
