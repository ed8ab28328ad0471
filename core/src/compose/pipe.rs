// asyncpipe/src/compose/pipe.rs

//! The `Pipe<S>` builder/runner and the `pipe!` macro.

use crate::compose::then::{compose, Then};
use crate::core::step::{Identity, Step, StepFuture};
use tracing::{event, Level};

/// A composed chain of steps, built once and run many times.
///
/// `Pipe` owns its steps and keeps no state between runs, so a single
/// instance (typically behind an `Arc`) can serve concurrent invocations.
#[derive(Debug, Clone)]
pub struct Pipe<S> {
  step: S,
  len: usize,
}

impl<E> Pipe<Identity<E>> {
  /// The zero-step pipe. Running it resolves with the input unchanged.
  pub fn identity() -> Self {
    Pipe {
      step: Identity::new(),
      len: 0,
    }
  }
}

impl<S> Pipe<S> {
  /// Starts a pipe with a single step.
  pub fn new(step: S) -> Self {
    Pipe { step, len: 1 }
  }

  /// Appends `next`, which receives this pipe's output.
  pub fn then<N>(self, next: N) -> Pipe<Then<S, N>> {
    Pipe {
      step: compose(self.step, next),
      len: self.len + 1,
    }
  }

  /// Number of steps appended to this pipe.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn step(&self) -> &S {
    &self.step
  }

  pub fn into_inner(self) -> S {
    self.step
  }

  /// Runs every step in order against `input`.
  ///
  /// Resolves with the last step's output, or with the first error any step
  /// returns; steps after a failing one are never called.
  pub async fn run<In>(&self, input: In) -> Result<S::Output, S::Error>
  where
    S: Step<In>,
  {
    event!(
      Level::TRACE,
      num_steps = self.len,
      input_type = %std::any::type_name::<In>(),
      "Pipe run starting."
    );
    let outcome = self.step.call(input).await;
    match &outcome {
      Ok(_) => event!(Level::TRACE, num_steps = self.len, "Pipe run completed."),
      Err(_) => event!(
        Level::DEBUG,
        num_steps = self.len,
        error_type = %std::any::type_name::<S::Error>(),
        "Pipe run short-circuited by a step."
      ),
    }
    outcome
  }
}

impl<In, S> Step<In> for Pipe<S>
where
  In: Send + 'static,
  S: Step<In>,
{
  type Output = S::Output;
  type Error = S::Error;

  fn call(&self, input: In) -> StepFuture<'_, S::Output, S::Error> {
    Box::pin(self.run(input))
  }
}

/// Builds a [`Pipe`] from a list of steps, run left to right.
///
/// ```
/// use asyncpipe::{map_step, pipe, step_fn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let p = pipe![
///   step_fn(|x: i32| async move { Ok::<_, ()>(x + 1) }),
///   map_step::<_, ()>(|x: i32| x * 2),
/// ];
/// assert_eq!(p.run(20).await, Ok(42));
/// # }
/// ```
///
/// `pipe![]` yields the identity pipe, which resolves with its input.
#[macro_export]
macro_rules! pipe {
  () => {
    $crate::Pipe::identity()
  };
  ($first:expr $(, $rest:expr)* $(,)?) => {
    $crate::Pipe::new($first)$(.then($rest))*
  };
}
