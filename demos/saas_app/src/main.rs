// asyncpipe/demos/saas_app/src/main.rs

mod config;
mod errors;
mod models;
mod pipelines;
mod state;
mod store;
mod web;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::Store;

use actix_web::{web as actix_data, App, HttpServer};
use asyncpipe::PipelineRegistry;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Directives from `RUST_LOG` when present and valid, `info` otherwise.
fn log_filter(rust_log: Option<String>) -> EnvFilter {
  rust_log
    .filter(|directives| !directives.trim().is_empty())
    .and_then(|directives| EnvFilter::try_new(directives).ok())
    .unwrap_or_else(|| EnvFilter::new("info"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting SaaS demo server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let store = Arc::new(Store::new());
  if app_config.seed_demo_data {
    store.seed_demo_data(app_config.invite_link_ttl_days).await;
    tracing::info!("Demo users: ada@, grace@, linus@, margaret@example.com (POST /login with {{\"email\": ...}}).");
  }

  // Pipelines are built once here and shared by every worker.
  let registry = Arc::new(PipelineRegistry::<AppError>::new());

  let app_state = AppState {
    store: store.clone(),
    registry: registry.clone(),
    config: app_config.clone(),
  };

  pipelines::register_all_pipelines(&registry, &app_state);

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!(base_url = %app_config.app_base_url, "Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
