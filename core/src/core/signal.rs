// asyncpipe/src/core/signal.rs

//! Defines `Signal`, the early-exit payload a step returns to abort a request
//! pipeline with an HTTP-level outcome.

use crate::error::PipeError;
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Why a request pipeline stopped before producing its output.
///
/// Steps return `Err(Signal)` both for expected outcomes (send the visitor to
/// the login page, answer 404) and for unexpected faults. The pipeline treats
/// them identically: the first signal wins and no later step runs. Mapping a
/// signal to a concrete response is left to the request layer.
#[derive(Debug, Error)]
pub enum Signal {
  /// Send the client to `location` with a 3xx `status`.
  #[error("Redirect ({status}) to {location}")]
  Redirect { location: String, status: u16 },

  /// Answer immediately with `status` and `body`.
  #[error("Respond with {status}: {body}")]
  Respond { status: u16, body: String },

  /// Something went wrong that no step anticipated.
  #[error("Unexpected fault: {0}")]
  Fault(#[from] AnyhowError),
}

impl Signal {
  /// Temporary redirect (302).
  pub fn redirect(location: impl Into<String>) -> Self {
    Self::redirect_with_status(location, 302)
  }

  pub fn redirect_with_status(location: impl Into<String>, status: u16) -> Self {
    Signal::Redirect {
      location: location.into(),
      status,
    }
  }

  pub fn respond(status: u16, body: impl Into<String>) -> Self {
    Signal::Respond {
      status,
      body: body.into(),
    }
  }

  pub fn bad_request(body: impl Into<String>) -> Self {
    Self::respond(400, body)
  }

  pub fn unauthorized(body: impl Into<String>) -> Self {
    Self::respond(401, body)
  }

  pub fn forbidden(body: impl Into<String>) -> Self {
    Self::respond(403, body)
  }

  pub fn not_found(body: impl Into<String>) -> Self {
    Self::respond(404, body)
  }

  /// HTTP status the signal stands for. Faults map to 500.
  pub fn status(&self) -> u16 {
    match self {
      Signal::Redirect { status, .. } => *status,
      Signal::Respond { status, .. } => *status,
      Signal::Fault(_) => 500,
    }
  }

  pub fn is_redirect(&self) -> bool {
    matches!(self, Signal::Redirect { .. })
  }

  pub fn location(&self) -> Option<&str> {
    match self {
      Signal::Redirect { location, .. } => Some(location.as_str()),
      _ => None,
    }
  }
}

impl From<PipeError> for Signal {
  fn from(err: PipeError) -> Self {
    Signal::Fault(AnyhowError::new(err))
  }
}
