// src/lib.rs

//! asyncpipe: sequential composition of asynchronous steps for Rust.
//!
//! A pipeline threads a value (usually a request context) through an ordered
//! list of steps. Each step may read it, enrich it into a new type, or abort
//! the whole chain by returning an error. asyncpipe provides:
//!  - The `Step<In>` trait plus adapters for async, sync, and infallible closures.
//!  - `Pipe` and the `pipe!` macro for type-checked chains of any length.
//!  - `Signal`, a ready-made early-exit payload (redirect, HTTP response, fault).
//!  - A named, homogeneous `Pipeline<C, E>` whose steps can be inserted,
//!    removed, made optional, or skipped conditionally.
//!  - A type-keyed `PipelineRegistry` for dispatching pipelines built at startup.

pub mod compose;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

// --- Re-exports for the Public API ---

pub use crate::core::signal::Signal;
pub use crate::core::step::{
  map_step, step_fn, sync_step, BoxStep, FnStep, Identity, MapStep, Step, StepFuture, SyncStep,
};

pub use crate::compose::{compose, Pipe, Then};

pub use crate::pipeline::definition::{Pipeline, SkipCondition, StepDef};

pub use crate::error::{PipeError, PipeResult};

pub use crate::registry::PipelineRegistry;

/*
    Core Workflow:
    1. Define one struct per stage of your context (e.g. `Request`,
       `Authenticated { request, user }`, `Scoped { .., organization }`).
    2. Write each step as `step_fn(|ctx| async move { ... })` (or `sync_step`,
       `map_step`), returning `Err(Signal::redirect(..))` etc. to abort.
    3. Chain them once at startup: `let p = pipe![authenticate, load_org, render];`
    4. Per request, `p.run(request).await` and map the `Err` to a response.
    5. Optionally register pipelines in a `PipelineRegistry` and dispatch by type.
*/
