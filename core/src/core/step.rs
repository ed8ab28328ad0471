// asyncpipe/src/core/step.rs

//! Defines the `Step<In>` trait, the unit every pipeline is built from, and the
//! adapters that turn plain closures into steps.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

/// The future returned by [`Step::call`].
///
/// Borrows the step for `'a`, so a step never needs to be cloned or `Arc`ed
/// to be invoked.
pub type StepFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A type-erased step, used where a list of steps with identical signatures is
/// assembled at runtime.
pub type BoxStep<In, Out, E> = Box<dyn Step<In, Output = Out, Error = E>>;

/// One unary, possibly asynchronous, transformation in a pipeline.
///
/// A step consumes its input and resolves either to the value handed to the
/// next step (`Ok`) or to the error that aborts the whole pipeline (`Err`).
/// Steps hold no per-invocation state: `call` takes `&self`, so the same step
/// can serve any number of concurrent invocations.
pub trait Step<In>: Send + Sync {
  /// Value handed to the next step.
  type Output: Send + 'static;
  /// Value the pipeline aborts with.
  type Error: Send + 'static;

  fn call(&self, input: In) -> StepFuture<'_, Self::Output, Self::Error>;
}

// --- Closure adapters ---

/// Step backed by an async closure. Built with [`step_fn`].
#[derive(Clone)]
pub struct FnStep<F> {
  f: F,
}

/// Wraps `Fn(In) -> impl Future<Output = Result<Out, E>>` as a step.
///
/// The closure is invoked when the step is called; any work it does before
/// returning its future therefore happens at call time, not poll time. Put
/// the work inside the `async` block to keep it lazy.
pub fn step_fn<F>(f: F) -> FnStep<F> {
  FnStep { f }
}

impl<F, Fut, In, Out, E> Step<In> for FnStep<F>
where
  F: Fn(In) -> Fut + Send + Sync,
  Fut: Future<Output = Result<Out, E>> + Send + 'static,
  In: Send + 'static,
  Out: Send + 'static,
  E: Send + 'static,
{
  type Output = Out;
  type Error = E;

  fn call(&self, input: In) -> StepFuture<'_, Out, E> {
    Box::pin((self.f)(input))
  }
}

/// Step backed by a synchronous, fallible closure. Built with [`sync_step`].
#[derive(Clone)]
pub struct SyncStep<F> {
  f: F,
}

/// Wraps `Fn(In) -> Result<Out, E>` as a step.
///
/// The closure runs when the returned future is first polled, so a sync step
/// composes exactly like an async step that returns a ready value.
pub fn sync_step<F>(f: F) -> SyncStep<F> {
  SyncStep { f }
}

impl<F, In, Out, E> Step<In> for SyncStep<F>
where
  F: Fn(In) -> Result<Out, E> + Send + Sync,
  In: Send + 'static,
  Out: Send + 'static,
  E: Send + 'static,
{
  type Output = Out;
  type Error = E;

  fn call(&self, input: In) -> StepFuture<'_, Out, E> {
    Box::pin(async move { (self.f)(input) })
  }
}

/// Step backed by an infallible synchronous closure. Built with [`map_step`].
pub struct MapStep<F, E> {
  f: F,
  _phantom_err: PhantomData<fn() -> E>,
}

/// Wraps `Fn(In) -> Out` as a step that never fails.
///
/// `E` is the error type the step advertises so it can sit in a chain whose
/// other steps fail with `E`.
pub fn map_step<F, E>(f: F) -> MapStep<F, E> {
  MapStep {
    f,
    _phantom_err: PhantomData,
  }
}

impl<F: Clone, E> Clone for MapStep<F, E> {
  fn clone(&self) -> Self {
    map_step(self.f.clone())
  }
}

impl<F, In, Out, E> Step<In> for MapStep<F, E>
where
  F: Fn(In) -> Out + Send + Sync,
  In: Send + 'static,
  Out: Send + 'static,
  E: Send + 'static,
{
  type Output = Out;
  type Error = E;

  fn call(&self, input: In) -> StepFuture<'_, Out, E> {
    Box::pin(async move { Ok((self.f)(input)) })
  }
}

// --- Identity ---

/// The step that resolves with its input unchanged. This is what a pipeline
/// with zero steps runs.
pub struct Identity<E> {
  _phantom_err: PhantomData<fn() -> E>,
}

impl<E> Identity<E> {
  pub fn new() -> Self {
    Identity {
      _phantom_err: PhantomData,
    }
  }
}

impl<E> Default for Identity<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E> Clone for Identity<E> {
  fn clone(&self) -> Self {
    Self::new()
  }
}

impl<E> fmt::Debug for Identity<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Identity")
      .field("error_type", &std::any::type_name::<E>())
      .finish()
  }
}

impl<In, E> Step<In> for Identity<E>
where
  In: Send + 'static,
  E: Send + 'static,
{
  type Output = In;
  type Error = E;

  fn call(&self, input: In) -> StepFuture<'_, In, E> {
    Box::pin(std::future::ready(Ok(input)))
  }
}

// --- Smart pointers ---

impl<In, S> Step<In> for Arc<S>
where
  S: Step<In> + ?Sized,
{
  type Output = S::Output;
  type Error = S::Error;

  fn call(&self, input: In) -> StepFuture<'_, S::Output, S::Error> {
    (**self).call(input)
  }
}

impl<In, S> Step<In> for Box<S>
where
  S: Step<In> + ?Sized,
{
  type Output = S::Output;
  type Error = S::Error;

  fn call(&self, input: In) -> StepFuture<'_, S::Output, S::Error> {
    (**self).call(input)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[tokio::test]
  async fn sync_step_runs_only_when_polled() {
    let calls = Arc::new(AtomicUsize::new(0));
    let spy = calls.clone();
    let step = sync_step(move |x: i32| {
      spy.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>(x + 1)
    });

    let fut = step.call(1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(fut.await, Ok(2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn boxed_steps_share_a_signature() {
    let steps: Vec<BoxStep<i32, i32, String>> = vec![
      Box::new(map_step::<_, String>(|x: i32| x * 10)),
      Box::new(step_fn(|x: i32| async move { Ok::<_, String>(x - 1) })),
      Box::new(Identity::<String>::new()),
    ];

    let mut results = Vec::new();
    for step in &steps {
      results.push(step.call(5).await.unwrap());
    }
    assert_eq!(results, vec![50, 4, 5]);
  }

  #[tokio::test]
  async fn arc_step_delegates() {
    let shared = Arc::new(sync_step(|s: String| Ok::<_, ()>(s.len())));
    assert_eq!(shared.call("four".to_string()).await, Ok(4));
  }
}
