// asyncpipe/demos/saas_app/src/pipelines/mod.rs

//! Defines and registers every request pipeline the app serves.

use crate::errors::AppError;
use crate::state::AppState;
use asyncpipe::PipelineRegistry;
use std::sync::Arc;

pub mod contexts; // Typed request contexts and page records
pub mod middleware; // Reusable guard steps shared by the pipelines below

pub mod auth_pipeline;
pub mod invite_pipeline;
pub mod organization_pipeline;

/// Registers all pipelines with `registry`.
///
/// Called once at startup; handlers then dispatch by input/output type.
pub fn register_all_pipelines(registry: &Arc<PipelineRegistry<AppError>>, app_state: &AppState) {
  tracing::info!("Registering request pipelines...");

  auth_pipeline::register_auth_pipelines(registry, app_state);
  organization_pipeline::register_organization_pipelines(registry, app_state);
  invite_pipeline::register_invite_pipelines(registry, app_state);

  tracing::info!(count = registry.len(), "All request pipelines registered.");
}
