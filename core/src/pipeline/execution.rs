// asyncpipe/src/pipeline/execution.rs

//! Contains `Pipeline::run()`, which threads the context through the declared
//! steps in order, and the `Step` impl that lets a `Pipeline` nest inside a
//! `Pipe`.

use crate::core::step::{Step, StepFuture};
use crate::error::PipeError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Instrument, Level};

impl<C, E> Pipeline<C, E>
where
  C: Send + 'static,
  E: From<PipeError> + Send + 'static,
{
  /// Executes the pipeline against `ctx`, consuming it.
  ///
  /// Each step receives exactly the context the previous step returned.
  /// Resolves with the context produced by the last executed step, or with the
  /// first error. A non-optional step with no registered handler fails the run
  /// with [`PipeError::HandlerMissing`], converted into `E`.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            pipeline_context_type = %std::any::type_name::<C>(),
            pipeline_error_type = %std::any::type_name::<E>(),
            num_steps = self.steps.len(),
        )
    )]
  pub async fn run(&self, ctx: C) -> Result<C, E> {
    event!(Level::DEBUG, "Pipeline execution starting.");
    let mut ctx = ctx;

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name_str = step_def.name.as_str();
      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step_name_str,
        step_index = step_idx,
        optional = step_def.optional
      );

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(&ctx) {
          event!(parent: &step_span, Level::INFO, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      let handler = match self.handlers.get(step_name_str) {
        Some(handler) => handler,
        None if step_def.optional => {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handler, skipping.");
          continue;
        }
        None => {
          event!(parent: &step_span, Level::ERROR, "Non-optional step has no handler.");
          return Err(E::from(PipeError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      ctx = match handler.call(ctx).instrument(step_span.clone()).await {
        Ok(next_ctx) => next_ctx,
        Err(e) => {
          event!(parent: &step_span, Level::DEBUG, "Step returned an error, aborting pipeline.");
          return Err(e);
        }
      };
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(ctx)
  }
}

impl<C, E> Step<C> for Pipeline<C, E>
where
  C: Send + 'static,
  E: From<PipeError> + Send + 'static,
{
  type Output = C;
  type Error = E;

  fn call(&self, input: C) -> StepFuture<'_, C, E> {
    Box::pin(self.run(input))
  }
}
