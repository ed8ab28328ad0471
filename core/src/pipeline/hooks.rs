// asyncpipe/src/pipeline/hooks.rs

//! Handler registration for named pipeline steps. Handlers may be async
//! closures, sync closures, or any `Step<C, Output = C>` (including a `Pipe`).

use tracing::{event, Level};

use crate::compose::pipe::Pipe;
use crate::core::step::{step_fn, sync_step, Identity, Step};
use crate::error::PipeError;
use crate::pipeline::definition::{Handler, Pipeline};
use std::future::Future;

impl<C, E> Pipeline<C, E>
where
  C: Send + 'static,
  E: From<PipeError> + Send + 'static,
{
  /// Registers an arbitrary step as the handler for `step_name`, replacing any
  /// previous handler.
  ///
  /// The step's error type only has to convert into the pipeline's `E`.
  pub fn on_step_with<S>(&mut self, step_name: &str, step: S)
  where
    S: Step<C, Output = C> + 'static,
    S::Error: Into<E>,
  {
    let idx = self.step_index(step_name);
    // The identity head pins the chain's error type to `E`.
    let handler: Handler<C, E> = Box::new(Pipe::<Identity<E>>::identity().then(step));
    if self.handlers.insert(self.steps[idx].name.clone(), handler).is_some() {
      event!(Level::DEBUG, %step_name, "Replaced existing step handler.");
    } else {
      event!(Level::TRACE, %step_name, "Step handler registered.");
    }
  }

  /// Registers an async handler for `step_name`.
  ///
  /// The handler takes the context by value and resolves to the context the
  /// next step receives, or to an error that aborts the run.
  pub fn on_step<F, Fut, UserErr>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + 'static,
  {
    self.on_step_with(step_name, step_fn(handler_fn));
  }

  /// Registers a synchronous handler for `step_name`.
  pub fn on_step_sync<F, UserErr>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(C) -> Result<C, UserErr> + Send + Sync + 'static,
    UserErr: Into<E> + Send + 'static,
  {
    self.on_step_with(step_name, sync_step(handler_fn));
  }
}
