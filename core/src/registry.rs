// asyncpipe/src/registry.rs

//! Defines `PipelineRegistry<AppErr>`, a type-keyed table of pipelines built
//! once at startup and dispatched per request by their input/output types.

use crate::core::step::Step;
use crate::error::PipeError;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

type ErasedValue = Box<dyn Any + Send>;

/// Type-erased runner so the registry can hold steps with unrelated signatures.
#[async_trait]
trait AnyStepRunner<AppErr>: Send + Sync
where
  AppErr: Send + 'static,
{
  async fn run_erased(&self, input: ErasedValue) -> Result<ErasedValue, AppErr>;
}

/// Wraps a `Step<In>` so its input and output travel as `Box<dyn Any + Send>`.
struct StepWrapper<In, S, AppErr> {
  step: S,
  _phantom: PhantomData<fn(In) -> AppErr>,
}

#[async_trait]
impl<In, S, AppErr> AnyStepRunner<AppErr> for StepWrapper<In, S, AppErr>
where
  In: Send + 'static,
  S: Step<In>,
  S::Error: Into<AppErr>,
  AppErr: From<PipeError> + Send + 'static,
{
  #[instrument(
        name = "StepWrapper::run_erased",
        skip_all,
        fields(
            input_type = %std::any::type_name::<In>(),
            output_type = %std::any::type_name::<S::Output>(),
        )
    )]
  async fn run_erased(&self, input: ErasedValue) -> Result<ErasedValue, AppErr> {
    let typed_input = match input.downcast::<In>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<In>();
        event!(Level::ERROR, "Pipeline input type mismatch. Expected {}.", expected_type);
        return Err(AppErr::from(PipeError::TypeMismatch {
          expected_type: expected_type.to_string(),
          context: "registry dispatch".to_string(),
        }));
      }
    };

    match self.step.call(typed_input).await {
      Ok(output) => Ok(Box::new(output) as ErasedValue),
      Err(e) => Err(e.into()),
    }
  }
}

/// A registry of pipelines keyed by `(input type, output type)`.
///
/// `AppErr` is the error type `run` returns. Each registered pipeline's error
/// must convert into it, and it must be constructible from [`PipeError`] for
/// dispatch failures (nothing registered for the requested types).
pub struct PipelineRegistry<AppErr = PipeError>
where
  AppErr: From<PipeError> + Send + 'static,
{
  registry: RwLock<HashMap<(TypeId, TypeId), Arc<dyn AnyStepRunner<AppErr>>>>,
}

impl<AppErr> PipelineRegistry<AppErr>
where
  AppErr: From<PipeError> + Send + 'static,
{
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `step` as the pipeline turning `In` into `S::Output`.
  ///
  /// A pipeline already registered for the same pair is replaced.
  pub fn register<In, S>(&self, step: S)
  where
    In: Send + 'static,
    S: Step<In> + 'static,
    S::Error: Into<AppErr>,
  {
    let key = (TypeId::of::<In>(), TypeId::of::<S::Output>());
    let wrapper = StepWrapper::<In, S, AppErr> {
      step,
      _phantom: PhantomData,
    };
    let replaced = self.registry.write().insert(key, Arc::new(wrapper)).is_some();
    event!(
      Level::DEBUG,
      input_type = %std::any::type_name::<In>(),
      output_type = %std::any::type_name::<S::Output>(),
      replaced,
      "Registered pipeline."
    );
  }

  /// Whether a pipeline from `In` to `Out` is registered.
  pub fn contains<In: 'static, Out: 'static>(&self) -> bool {
    self
      .registry
      .read()
      .contains_key(&(TypeId::of::<In>(), TypeId::of::<Out>()))
  }

  pub fn len(&self) -> usize {
    self.registry.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.registry.read().is_empty()
  }

  /// Runs the pipeline registered for `In -> Out` against `input`.
  pub async fn run<In, Out>(&self, input: In) -> Result<Out, AppErr>
  where
    In: Send + 'static,
    Out: Send + 'static,
  {
    let input_type = std::any::type_name::<In>();
    let output_type = std::any::type_name::<Out>();
    event!(Level::DEBUG, %input_type, %output_type, "Dispatching pipeline.");

    // Clone the runner out so the lock is released before awaiting.
    let runner = self
      .registry
      .read()
      .get(&(TypeId::of::<In>(), TypeId::of::<Out>()))
      .cloned()
      .ok_or_else(|| {
        event!(Level::ERROR, %input_type, %output_type, "No pipeline registered.");
        AppErr::from(PipeError::NotRegistered {
          input_type: input_type.to_string(),
          output_type: output_type.to_string(),
        })
      })?;

    let output = runner.run_erased(Box::new(input)).await?;
    match output.downcast::<Out>() {
      Ok(boxed) => Ok(*boxed),
      Err(_) => Err(AppErr::from(PipeError::TypeMismatch {
        expected_type: output_type.to_string(),
        context: "registry output".to_string(),
      })),
    }
  }
}

impl<AppErr> Default for PipelineRegistry<AppErr>
where
  AppErr: From<PipeError> + Send + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
