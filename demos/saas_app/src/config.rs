// asyncpipe/demos/saas_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub app_base_url: String,

  /// Name of the cookie carrying the session token.
  pub session_cookie_name: String,

  /// Seed the in-memory store with demo users and organizations on startup.
  pub seed_demo_data: bool,

  /// Lifetime of invite links created by the seeder.
  pub invite_link_ttl_days: i64,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let session_cookie_name = get_env("SESSION_COOKIE_NAME").unwrap_or_else(|_| "session".to_string());
    if session_cookie_name.trim().is_empty() {
      return Err(AppError::Config("SESSION_COOKIE_NAME must not be empty".to_string()));
    }

    let seed_demo_data = get_env("SEED_DEMO_DATA")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DEMO_DATA value: {}", e)))?;

    let invite_link_ttl_days = get_env("INVITE_LINK_TTL_DAYS")
      .unwrap_or_else(|_| "7".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid INVITE_LINK_TTL_DAYS: {}", e)))?;
    if invite_link_ttl_days <= 0 {
      return Err(AppError::Config("INVITE_LINK_TTL_DAYS must be positive".to_string()));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      app_base_url,
      session_cookie_name,
      seed_demo_data,
      invite_link_ttl_days,
    })
  }
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      app_base_url: "http://127.0.0.1:8080".to_string(),
      session_cookie_name: "session".to_string(),
      seed_demo_data: true,
      invite_link_ttl_days: 7,
    }
  }
}
