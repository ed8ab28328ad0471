// asyncpipe/src/pipeline/mod.rs

//! Defines the named, homogeneous `Pipeline<C, E>`, its construction,
//! modification, and execution logic.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::{Handler, Pipeline, SkipCondition, StepDef};
