// asyncpipe/src/compose/mod.rs

//! Left-to-right composition of heterogeneous steps.
//!
//! `Then<A, B>` is the only combinator: it feeds `A`'s output into `B`.
//! Longer chains nest it (`Then<Then<A, B>, C>`), which keeps every link
//! type-checked regardless of chain length. `Pipe` and the `pipe!` macro
//! are the ergonomic front end.

pub mod pipe;
pub mod then;

pub use pipe::Pipe;
pub use then::{compose, Then};
