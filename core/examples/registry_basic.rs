// asyncpipe/examples/registry_basic.rs

use asyncpipe::{map_step, pipe, step_fn, PipelineRegistry, Signal};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
struct Visitor {
  name: Option<String>,
}

#[derive(Debug)]
struct Greeting(String);

#[derive(Debug)]
struct Badge {
  initials: String,
}

#[tokio::main]
async fn main() -> Result<(), Signal> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Registry Example ---");

  // Built once at startup...
  let registry = Arc::new(PipelineRegistry::<Signal>::new());
  registry.register::<Visitor, _>(pipe![
    step_fn(|v: Visitor| async move { v.name.ok_or_else(|| Signal::redirect("/login")) }),
    map_step::<_, Signal>(|name: String| Greeting(format!("Welcome back, {}!", name))),
  ]);
  registry.register::<Visitor, _>(pipe![step_fn(|v: Visitor| async move {
    let name = v.name.ok_or_else(|| Signal::unauthorized("anonymous visitors have no badge"))?;
    Ok::<_, Signal>(Badge {
      initials: name.split_whitespace().filter_map(|w| w.chars().next()).collect(),
    })
  })]);

  // ...dispatched per request by input and output type.
  let greeting: Greeting = registry
    .run(Visitor {
      name: Some("Ada Lovelace".to_string()),
    })
    .await?;
  let badge: Badge = registry
    .run(Visitor {
      name: Some("Ada Lovelace".to_string()),
    })
    .await?;
  info!(?greeting, ?badge, "Ran two pipelines on the same input type.");

  let anonymous: Result<Greeting, Signal> = registry.run(Visitor { name: None }).await;
  if let Err(signal) = anonymous {
    info!(location = ?signal.location(), "Anonymous visitor redirected.");
  }

  info!("--- Registry Example Finished ---");
  Ok(())
}
