//! Stable exit codes for the runner and its launch shim.

/// Every child was reaped.
pub const OK: i32 = 0;
/// The runner could not create a new process.
pub const SPAWN_FAILED: i32 = 1;
/// The launch shim could not execute the requested program.
pub const LAUNCH_FAILED: i32 = 2;
/// Invalid invocation, configuration, or unreadable input.
pub const INVALID: i32 = 3;
/// The launch shim could not open its `.out` / `.err` files.
pub const OUTPUT_UNAVAILABLE: i32 = 4;
