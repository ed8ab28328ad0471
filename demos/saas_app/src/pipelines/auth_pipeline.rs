// asyncpipe/demos/saas_app/src/pipelines/auth_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::{LoginPage, LoginRequest, LoginSubmission, SessionIssued};
use crate::pipelines::middleware::require_anonymous;
use crate::state::AppState;
use crate::store::Store;
use asyncpipe::{map_step, pipe, step_fn, PipelineRegistry, Signal, Step};
use std::sync::Arc;
use tracing::{event, Level};

/// Landing page after login when no (safe) `redirectTo` was given.
pub const DEFAULT_AFTER_LOGIN: &str = "/organizations";

/// Keeps only same-site absolute paths; anything else falls back to the default.
/// Browsers read `/\host` like `//host`, so both are rejected.
pub fn safe_redirect_target(redirect_to: Option<&str>) -> String {
  match redirect_to {
    Some(target) if target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\") => {
      target.to_string()
    }
    _ => DEFAULT_AFTER_LOGIN.to_string(),
  }
}

/// `GET /login`: visitors only.
pub fn login_page_pipeline(store: Arc<Store>) -> impl Step<LoginRequest, Output = LoginPage, Error = Signal> {
  pipe![
    require_anonymous::<LoginRequest>(store),
    map_step::<_, Signal>(|request: LoginRequest| LoginPage {
      redirect_to: request.redirect_to,
    }),
  ]
}

/// `POST /login`: looks the email up and opens a session.
pub fn login_submit_pipeline(store: Arc<Store>) -> impl Step<LoginSubmission, Output = SessionIssued, Error = Signal> {
  let session_store = store.clone();
  pipe![
    require_anonymous::<LoginSubmission>(store),
    step_fn(move |submission: LoginSubmission| {
      let store = session_store.clone();
      async move {
        if submission.email.trim().is_empty() {
          return Err(Signal::bad_request("Email is required."));
        }
        let user = match store.find_user_by_email(&submission.email).await {
          Some(user) => user,
          None => {
            event!(Level::INFO, "Login attempt for unknown email.");
            return Err(Signal::unauthorized("Unknown email address."));
          }
        };
        let session = store.create_session(user.id).await;
        event!(Level::INFO, user_id = %user.id, "Session issued.");
        Ok(SessionIssued {
          session_token: session.token,
          redirect_to: safe_redirect_target(submission.redirect_to.as_deref()),
        })
      }
    }),
  ]
}

pub fn register_auth_pipelines(registry: &Arc<PipelineRegistry<AppError>>, app_state: &AppState) {
  registry.register::<LoginRequest, _>(login_page_pipeline(app_state.store.clone()));
  registry.register::<LoginSubmission, _>(login_submit_pipeline(app_state.store.clone()));
  event!(Level::DEBUG, "Auth pipelines registered.");
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pipelines::contexts::PageRequest;

  fn submission(email: &str, redirect_to: Option<&str>, session_token: Option<String>) -> LoginSubmission {
    LoginSubmission {
      page: PageRequest {
        path: "/login".to_string(),
        session_token,
      },
      email: email.to_string(),
      redirect_to: redirect_to.map(str::to_string),
    }
  }

  #[test]
  fn redirect_target_must_be_a_local_path() {
    assert_eq!(safe_redirect_target(Some("/organizations/acme")), "/organizations/acme");
    assert_eq!(safe_redirect_target(Some("//evil.example")), DEFAULT_AFTER_LOGIN);
    assert_eq!(safe_redirect_target(Some("/\\evil.example")), DEFAULT_AFTER_LOGIN);
    assert_eq!(safe_redirect_target(Some("https://evil.example")), DEFAULT_AFTER_LOGIN);
    assert_eq!(safe_redirect_target(None), DEFAULT_AFTER_LOGIN);
  }

  #[tokio::test]
  async fn login_issues_session_and_honors_redirect() {
    let store = Arc::new(Store::new());
    store.seed_demo_data(7).await;
    let pipeline = login_submit_pipeline(store.clone());

    let issued = pipeline
      .call(submission("ADA@example.com", Some("/organizations/acme"), None))
      .await
      .unwrap();
    assert_eq!(issued.redirect_to, "/organizations/acme");
    let user = store.find_session_user(&issued.session_token).await.unwrap();
    assert_eq!(user.email, "ada@example.com");

    // Already signed in: bounced before any lookup.
    let again = pipeline
      .call(submission("ada@example.com", None, Some(issued.session_token)))
      .await
      .unwrap_err();
    assert_eq!(again.location(), Some("/organizations"));

    let unknown = pipeline.call(submission("nobody@example.com", None, None)).await.unwrap_err();
    assert_eq!(unknown.status(), 401);
  }

  #[tokio::test]
  async fn login_page_carries_redirect_target() {
    let store = Arc::new(Store::new());
    let page = login_page_pipeline(store)
      .call(LoginRequest {
        page: PageRequest {
          path: "/login".to_string(),
          session_token: None,
        },
        redirect_to: Some("/organizations/acme".to_string()),
      })
      .await
      .unwrap();
    assert_eq!(page.redirect_to.as_deref(), Some("/organizations/acme"));
  }
}
