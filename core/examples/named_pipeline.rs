// asyncpipe/examples/named_pipeline.rs

use asyncpipe::{PipeError, Pipeline, SkipCondition};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum ExampleAppError {
  #[error("Import rejected: {0}")]
  Rejected(String),

  #[error("asyncpipe framework error during pipeline execution: {0}")]
  Framework(#[from] PipeError),
}

#[derive(Clone, Debug, Default)]
struct ImportContext {
  rows: Vec<String>,
  dry_run: bool,
  log: Vec<String>,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Named Pipeline Example ---");

  let skip_on_dry_run: SkipCondition<ImportContext> = Arc::new(|ctx: &ImportContext| ctx.dry_run);
  let mut pipeline = Pipeline::<ImportContext, ExampleAppError>::new(&[
    ("trim", false, None),
    ("validate", false, None),
    ("persist", false, Some(skip_on_dry_run)),
  ]);

  pipeline.on_step_sync("trim", |mut ctx: ImportContext| {
    ctx.rows = ctx.rows.iter().map(|r| r.trim().to_string()).collect();
    ctx.log.push("trimmed".to_string());
    Ok::<_, ExampleAppError>(ctx)
  });
  pipeline.on_step_sync("validate", |mut ctx: ImportContext| {
    if ctx.rows.iter().any(|r| r.is_empty()) {
      return Err(ExampleAppError::Rejected("blank row".to_string()));
    }
    ctx.log.push("validated".to_string());
    Ok(ctx)
  });
  pipeline.on_step("persist", |mut ctx: ImportContext| async move {
    tokio::task::yield_now().await;
    ctx.log.push(format!("persisted {} rows", ctx.rows.len()));
    Ok::<_, ExampleAppError>(ctx)
  });

  // Audit logging is added after the fact, between validation and persistence.
  pipeline.insert_after_step("validate", "audit", true, None);
  pipeline.on_step_sync("audit", |mut ctx: ImportContext| {
    ctx.log.push("audited".to_string());
    Ok::<_, ExampleAppError>(ctx)
  });
  info!(steps = ?pipeline.step_names(), "Pipeline declared.");

  let ctx = ImportContext {
    rows: vec![" alpha ".to_string(), "beta".to_string()],
    ..Default::default()
  };
  match pipeline.run(ctx).await {
    Ok(done) => info!(log = ?done.log, "Import finished."),
    Err(e) => error!(error = %e, "Import failed."),
  }

  let dry = ImportContext {
    rows: vec!["gamma".to_string()],
    dry_run: true,
    ..Default::default()
  };
  match pipeline.run(dry).await {
    Ok(done) => info!(log = ?done.log, "Dry run finished without persisting."),
    Err(e) => error!(error = %e, "Dry run failed."),
  }

  let bad = ImportContext {
    rows: vec!["   ".to_string()],
    ..Default::default()
  };
  if let Err(e) = pipeline.run(bad).await {
    info!(error = %e, "Blank rows were rejected as expected.");
  }

  info!("--- Named Pipeline Example Finished ---");
}
