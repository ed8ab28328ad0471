// asyncpipe/demos/saas_app/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::store::Store;
use asyncpipe::PipelineRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<Store>,
  pub registry: Arc<PipelineRegistry<AppError>>,
  pub config: Arc<AppConfig>, // Share loaded config
}
