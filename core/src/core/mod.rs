pub mod signal;
pub mod step;

// Re-export key types for easier access from other asyncpipe modules (and lib.rs)
pub use signal::Signal;
pub use step::{map_step, step_fn, sync_step, BoxStep, FnStep, Identity, MapStep, Step, StepFuture, SyncStep};
