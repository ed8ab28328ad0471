// asyncpipe/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Errors raised by the pipeline machinery itself, as opposed to errors
/// returned by user-provided steps.
///
/// Pipelines and registries convert these into their own error type through a
/// `From<PipeError>` bound, so they surface through the same channel as step
/// failures.
#[derive(Debug, Error)]
pub enum PipeError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No pipeline registered for input {input_type} and output {output_type}")]
  NotRegistered { input_type: String, output_type: String },

  #[error("Type mismatch during {context} (expected {expected_type})")]
  TypeMismatch { expected_type: String, context: String },

  #[error("Error in step or external operation. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal asyncpipe error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for PipeError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a PipeError that was boxed into anyhow on its way here instead of nesting it.
    match err.downcast::<PipeError>() {
      Ok(pipe_err) => pipe_err,
      Err(source) => PipeError::Handler { source },
    }
  }
}

pub type PipeResult<T, E = PipeError> = std::result::Result<T, E>;
