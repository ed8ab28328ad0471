// asyncpipe/src/pipeline/definition.rs

//! Contains the `Pipeline<C, E>` struct definition and methods for its
//! construction and structural modification.

use crate::core::step::BoxStep;
use crate::error::PipeError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Predicate evaluated against the current context before a step runs.
/// If it returns `true`, the step is skipped and the context passes through.
pub type SkipCondition<C> = Arc<dyn Fn(&C) -> bool + Send + Sync + 'static>;

/// A registered step handler: consumes the context, yields the next one.
pub type Handler<C, E> = BoxStep<C, C, E>;

/// Definition of a pipeline step: its name, optionality, and skip condition.
#[derive(Clone)]
pub struct StepDef<C: 'static> {
  pub name: String,
  pub optional: bool,
  pub skip_if: Option<SkipCondition<C>>,
}

impl<C: 'static> fmt::Debug for StepDef<C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}

/// A named, ordered chain of `C -> C` steps.
///
/// This is the homogeneous counterpart of [`crate::Pipe`]: every step sees and
/// returns the same context type, which lets steps be addressed by name,
/// inserted, removed, made optional, or skipped conditionally after the
/// pipeline has been declared.
///
/// `E` must be constructible from [`PipeError`] so that configuration problems
/// discovered at run time (a required step with no handler) surface through
/// the pipeline's own error type.
pub struct Pipeline<C, E>
where
  C: Send + 'static,
  E: From<PipeError> + Send + 'static,
{
  /// Ordered list of step definitions for this pipeline.
  pub(crate) steps: Vec<StepDef<C>>,
  pub(crate) handlers: HashMap<String, Handler<C, E>>,
}

impl<C, E> Pipeline<C, E>
where
  C: Send + 'static,
  E: From<PipeError> + Send + 'static,
{
  /// Creates a new `Pipeline` from `(name, optional, skip_if)` triples.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<C>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_cond_opt)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_cond_opt.clone(),
      })
      .collect();

    Self {
      steps,
      handlers: HashMap::new(),
    }
  }

  /// Index of `step_name`. Panics if the step is not declared; an unknown name
  /// is a setup mistake, not a runtime condition.
  pub(crate) fn step_index(&self, step_name: &str) -> usize {
    match self.steps.iter().position(|s| s.name == step_name) {
      Some(idx) => idx,
      None => panic!(
        "asyncpipe setup error: Step '{}' not found in pipeline definition.",
        step_name
      ),
    }
  }

  fn ensure_step_not_exists(&self, step_name: &str) {
    if self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "asyncpipe setup error: Step '{}' already exists in pipeline definition.",
        step_name
      );
    }
  }

  fn insert_at(&mut self, idx: usize, name: String, optional: bool, skip_if: Option<SkipCondition<C>>) {
    self.ensure_step_not_exists(&name);
    self.steps.insert(idx, StepDef { name, optional, skip_if });
  }

  // --- Step Manipulation ---

  pub fn insert_before_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<C>>,
  ) {
    let idx = self.step_index(existing_step_name);
    self.insert_at(idx, new_step_name.into(), optional, skip_if);
  }

  pub fn insert_after_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<C>>,
  ) {
    let idx = self.step_index(existing_step_name);
    self.insert_at(idx + 1, new_step_name.into(), optional, skip_if);
  }

  /// Appends a step at the end of the pipeline.
  pub fn push_step<S: Into<String>>(&mut self, new_step_name: S, optional: bool, skip_if: Option<SkipCondition<C>>) {
    let idx = self.steps.len();
    self.insert_at(idx, new_step_name.into(), optional, skip_if);
  }

  /// Removes a step and its handler. Returns `false` if no such step exists.
  pub fn remove_step(&mut self, step_name: &str) -> bool {
    match self.steps.iter().position(|s| s.name == step_name) {
      Some(idx) => {
        self.steps.remove(idx);
        self.handlers.remove(step_name);
        true
      }
      None => false,
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    let idx = self.step_index(step_name);
    self.steps[idx].optional = optional;
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<C>>) {
    let idx = self.step_index(step_name);
    self.steps[idx].skip_if = skip_if;
  }

  // --- Inspection ---

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn has_handler(&self, step_name: &str) -> bool {
    self.handlers.contains_key(step_name)
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}

impl<C, E> fmt::Debug for Pipeline<C, E>
where
  C: Send + 'static,
  E: From<PipeError> + Send + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("steps", &self.steps)
      .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
      .finish()
  }
}
