// asyncpipe/demos/saas_app/src/errors.rs

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use asyncpipe::{PipeError, Signal};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  /// A pipeline step stopped the request early: redirect, HTTP error, or fault.
  #[error("Request halted by pipeline: {0}")]
  Halted(#[from] Signal),

  #[error("Pipeline framework error: {source}")]
  Pipeline {
    #[from]
    source: PipeError,
  },

  #[error("Configuration Error: {0}")]
  Config(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Halted(Signal::Fault(err))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Halted(signal) => StatusCode::from_u16(signal.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::Halted(Signal::Redirect { location, .. }) => {
        tracing::debug!(%location, "Pipeline redirected the request.");
        HttpResponse::build(self.status_code())
          .insert_header((header::LOCATION, location.as_str()))
          .finish()
      }
      AppError::Halted(Signal::Respond { body, .. }) => {
        tracing::info!(status = self.status_code().as_u16(), %body, "Pipeline answered the request early.");
        HttpResponse::build(self.status_code()).json(json!({ "error": body }))
      }
      AppError::Halted(Signal::Fault(source)) => {
        tracing::error!(error = ?source, "Pipeline step failed.");
        HttpResponse::InternalServerError().json(json!({ "error": "An internal error occurred" }))
      }
      AppError::Pipeline { source } => {
        tracing::error!(pipe_error = ?source, "Pipeline framework error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Request processing error", "detail": source.to_string()}))
      }
      AppError::Config(m) => {
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
