// asyncpipe/src/compose/then.rs

use crate::core::step::{Step, StepFuture};

/// Runs `first`, then hands its output to `second`.
///
/// If `first` fails, `second` is never called and the error is returned as-is.
/// An error from `second` is converted into `first`'s error type with `Into`.
#[derive(Debug, Clone)]
pub struct Then<A, B> {
  first: A,
  second: B,
}

/// Composes two steps into one.
pub fn compose<A, B>(first: A, second: B) -> Then<A, B> {
  Then { first, second }
}

impl<A, B> Then<A, B> {
  pub fn into_parts(self) -> (A, B) {
    (self.first, self.second)
  }
}

impl<In, A, B> Step<In> for Then<A, B>
where
  In: Send + 'static,
  A: Step<In>,
  B: Step<A::Output>,
  B::Error: Into<A::Error>,
{
  type Output = B::Output;
  type Error = A::Error;

  fn call(&self, input: In) -> StepFuture<'_, B::Output, A::Error> {
    Box::pin(async move {
      let intermediate = self.first.call(input).await?;
      self.second.call(intermediate).await.map_err(Into::into)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::step::{map_step, sync_step};

  #[derive(Debug, PartialEq)]
  struct Narrow(&'static str);

  #[derive(Debug, PartialEq)]
  struct Wide(String);

  impl From<Narrow> for Wide {
    fn from(n: Narrow) -> Self {
      Wide(n.0.to_string())
    }
  }

  #[tokio::test]
  async fn second_error_is_converted_into_first_error_type() {
    let step = compose(
      map_step::<_, Wide>(|x: u8| x),
      sync_step(|_x: u8| Err::<u8, _>(Narrow("rejected"))),
    );
    assert_eq!(step.call(1).await, Err(Wide("rejected".to_string())));
  }

  #[tokio::test]
  async fn nested_then_keeps_left_to_right_order() {
    let step = compose(
      compose(
        map_step::<_, ()>(|s: String| s + "a"),
        map_step::<_, ()>(|s: String| s + "b"),
      ),
      map_step::<_, ()>(|s: String| s + "c"),
    );
    assert_eq!(step.call(String::new()).await, Ok("abc".to_string()));
  }
}
