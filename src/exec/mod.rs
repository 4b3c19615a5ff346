// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the concrete
//!   `RealProcessBackend` that spawns one `launch` shim per command.
//! - [`shim`] is the child-side half of a launch: redirect, banner, `exec`.
//! - [`output`] names and opens the per-process `.out` / `.err` files.

pub mod backend;
pub mod output;
pub mod shim;

pub use backend::{LaunchRequest, ProcessBackend, RealProcessBackend, SpawnedChild, WaitFuture};
pub use output::{OutputLayout, OutputPair};
pub use shim::{ShimRequest, exec_command};
