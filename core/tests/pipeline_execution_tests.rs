// tests/pipeline_execution_tests.rs
mod common; // Reference the common module

use asyncpipe::{map_step, pipe, PipeError, Pipeline, Signal, SkipCondition};
use common::*;
use serial_test::serial;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_pipeline_runs_steps_in_order() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("step1", false, None), ("step2", false, None), ("step3", false, None)]);

  pipeline.on_step_with("step1", create_simple_handler("step1", " S1"));
  pipeline.on_step_with("step2", create_simple_handler("step2", " S2"));
  pipeline.on_step_with("step3", create_simple_handler("step3", " S3"));

  let result = pipeline.run(TestContext::default()).await.unwrap();

  assert_eq!(result.counter, 3);
  assert_eq!(result.message, " S1 S2 S3");
  assert_eq!(result.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_propagates_handler_error() {
  setup_tracing();
  reset_counters();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("good_step", false, None),
    ("bad_step", false, None),
    ("another_step", false, None),
  ]);

  pipeline.on_step_with("good_step", create_simple_handler("good_step", "Good"));
  pipeline.on_step_with("bad_step", create_failing_handler("bad_step", "I am a bad step!"));
  pipeline.on_step("another_step", |ctx: TestContext| async move {
    HANDLER_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    Ok::<_, TestError>(ctx)
  });

  let result = pipeline.run(TestContext::default()).await;

  match result {
    Err(TestError::Handler(msg)) => assert_eq!(msg, "I am a bad step!"),
    other => panic!("Expected TestError::Handler, got {:?}", other),
  }
  assert_eq!(HANDLER_EXEC_COUNTER.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[serial]
async fn test_pipeline_skips_step_if_condition_met() {
  setup_tracing();
  let skip_when_counted: SkipCondition<TestContext> = Arc::new(|ctx: &TestContext| ctx.counter > 0);
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("step1", false, None),
    ("step_to_skip", false, Some(skip_when_counted)),
    ("step3", false, None),
  ]);

  pipeline.on_step_with("step1", create_simple_handler("step1", " S1"));
  pipeline.on_step_with("step_to_skip", create_simple_handler("step_to_skip", " SKIPPED_THIS"));
  pipeline.on_step_with("step3", create_simple_handler("step3", " S3"));

  let result = pipeline.run(TestContext::default()).await.unwrap();
  assert_eq!(result.counter, 2); // step1 and step3 ran
  assert_eq!(result.message, " S1 S3");
  assert_eq!(result.steps_executed, vec!["step1", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_optional_step_missing_handler_succeeds() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("optional_step_no_handler", true, None),
    ("counted", false, None),
  ]);
  pipeline.on_step_with("counted", create_simple_handler("counted", "C"));

  let result = pipeline.run(TestContext::default()).await.unwrap();
  assert_eq!(result.steps_executed, vec!["counted"]);
}

#[tokio::test]
#[serial]
async fn test_sync_handlers_mix_with_async_handlers() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("sync_step", false, None), ("async_step", false, None)]);

  pipeline.on_step_sync("sync_step", |mut ctx: TestContext| {
    ctx.counter = 20;
    Ok::<_, TestError>(ctx)
  });
  pipeline.on_step("async_step", |mut ctx: TestContext| async move {
    tokio::task::yield_now().await;
    ctx.counter = (ctx.counter + 1) * 2;
    Ok::<_, TestError>(ctx)
  });

  assert_eq!(pipeline.run(TestContext::default()).await.unwrap().counter, 42);
}

#[tokio::test]
#[serial]
async fn test_structural_changes_reorder_execution() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("middle", false, None)]);
  pipeline.insert_before_step("middle", "first", false, None);
  pipeline.insert_after_step("middle", "last", false, None);
  pipeline.push_step("tail", true, None);

  assert_eq!(pipeline.step_names(), vec!["first", "middle", "last", "tail"]);

  pipeline.on_step_with("first", create_simple_handler("first", "1"));
  pipeline.on_step_with("middle", create_simple_handler("middle", "2"));
  pipeline.on_step_with("last", create_simple_handler("last", "3"));

  assert_eq!(pipeline.run(TestContext::default()).await.unwrap().message, "123");

  assert!(pipeline.remove_step("middle"));
  assert!(!pipeline.remove_step("middle"));
  assert!(!pipeline.has_handler("middle"));
  assert_eq!(pipeline.run(TestContext::default()).await.unwrap().message, "13");
}

#[tokio::test]
#[serial]
async fn test_registering_twice_replaces_handler() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("only", false, None)]);
  pipeline.on_step_with("only", create_simple_handler("only", "old"));
  pipeline.on_step_with("only", create_simple_handler("only", "new"));

  let result = pipeline.run(TestContext::default()).await.unwrap();
  assert_eq!(result.message, "new");
  assert_eq!(result.counter, 1);
}

#[tokio::test]
#[serial]
async fn test_set_optional_and_skip_condition_after_declaration() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("unhandled", false, None), ("counted", false, None)]);
  pipeline.on_step_with("counted", create_simple_handler("counted", "C"));

  assert!(pipeline.run(TestContext::default()).await.is_err());

  pipeline.set_optional("unhandled", true);
  assert_eq!(pipeline.run(TestContext::default()).await.unwrap().counter, 1);

  pipeline.set_skip_condition("counted", Some(Arc::new(|_ctx: &TestContext| true)));
  assert_eq!(pipeline.run(TestContext::default()).await.unwrap().counter, 0);
}

#[tokio::test]
#[should_panic(expected = "not found in pipeline definition")]
async fn test_registering_unknown_step_panics() {
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("known", false, None)]);
  pipeline.on_step_with("unknown", create_simple_handler("unknown", "x"));
}

#[tokio::test]
#[should_panic(expected = "already exists in pipeline definition")]
async fn test_inserting_duplicate_step_panics() {
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("known", false, None)]);
  pipeline.insert_after_step("known", "known", false, None);
}

#[tokio::test]
#[serial]
async fn test_pipe_as_step_handler() {
  setup_tracing();
  let mut pipeline = Pipeline::<i64, Signal>::new(&[("arithmetic", false, None)]);
  pipeline.on_step_with(
    "arithmetic",
    pipe![map_step::<_, Signal>(|x: i64| x + 1), map_step::<_, Signal>(|x: i64| x * 2)],
  );

  assert_eq!(pipeline.run(20).await.unwrap(), 42);
}

#[tokio::test]
#[serial]
async fn test_pipeline_as_step_inside_pipe() {
  setup_tracing();
  let mut pipeline = Pipeline::<i64, TestError>::new(&[("double", false, None)]);
  pipeline.on_step_sync("double", |x: i64| Ok::<_, TestError>(x * 2));

  let p = pipe![map_step::<_, TestError>(|x: i64| x + 1), pipeline];
  assert_eq!(p.run(20).await, Ok(42));
}

#[tokio::test]
#[serial]
async fn test_pipeline_with_pipe_error_type() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, PipeError>::new(&[("task", false, None)]);
  pipeline.on_step_sync("task", |_ctx: TestContext| {
    Err::<TestContext, _>(PipeError::Internal("Intentional PipeError".to_string()))
  });

  match pipeline.run(TestContext::default()).await {
    Err(PipeError::Internal(s)) => assert_eq!(s, "Intentional PipeError"),
    other => panic!("Expected PipeError::Internal, got {:?}", other),
  }
}
