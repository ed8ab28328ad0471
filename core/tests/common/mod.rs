// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use asyncpipe::pipeline::Handler;
use asyncpipe::{step_fn, sync_step, PipeError};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Common Context Structs ---
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
}

// Request-shaped contexts, each stage a superset of the previous one.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRequest {
  pub path: String,
  pub session_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WithUser {
  pub request: RawRequest,
  pub user_id: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WithOrganization {
  pub with_user: WithUser,
  pub organization_slug: String,
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("asyncpipe framework error: {0}")]
  Pipe(String), // Stored as String for Eq comparison

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipeError> for TestError {
  fn from(pe: PipeError) -> Self {
    TestError::Pipe(format!("{:?}", pe))
  }
}

// --- Common Handler Creators ---
pub fn create_simple_handler(step_name: &'static str, message_to_append: &'static str) -> Handler<TestContext, TestError> {
  Box::new(step_fn(move |mut ctx: TestContext| async move {
    ctx.counter += 1;
    ctx.message.push_str(message_to_append);
    ctx.steps_executed.push(step_name.to_string());
    tracing::debug!(target: "test_handlers", step = %step_name, "executed, counter: {}, message: '{}'", ctx.counter, ctx.message);
    Ok::<_, TestError>(ctx)
  }))
}

pub fn create_failing_handler(step_name: &'static str, error_message: &'static str) -> Handler<TestContext, TestError> {
  Box::new(sync_step(move |_ctx: TestContext| {
    tracing::warn!(target: "test_handlers", step = %step_name, "failing with: '{}'", error_message);
    Err::<TestContext, _>(TestError::Handler(error_message.to_string()))
  }))
}

/// Async step that counts its invocations on `counter` and adds `delta`.
pub fn counting_add(counter: Arc<AtomicUsize>, delta: i64) -> impl asyncpipe::Step<i64, Output = i64, Error = TestError> {
  step_fn(move |x: i64| {
    let counter = counter.clone();
    async move {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok::<_, TestError>(x + delta)
    }
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static HANDLER_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));
pub static LATE_STEP_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  HANDLER_EXEC_COUNTER.store(0, Ordering::SeqCst);
  LATE_STEP_EXEC_COUNTER.store(0, Ordering::SeqCst);
}
