// src/engine/mod.rs

//! Launch / reap lifecycle.
//!
//! - [`launcher`] reads the input, tokenizes each line and spawns a child
//!   for it without waiting on earlier ones.
//! - [`reaper`] collects terminated children in termination order and
//!   appends their completion records.
//! - [`runtime`] drives both phases, plus cancellation and the optional
//!   reap timeout.

use crate::types::TerminationOutcome;

/// A launched child, as remembered until it is reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildRecord {
    pub pid: u32,
    pub seq: u64,
}

/// What the wait on one child produced.
#[derive(Debug)]
pub struct ReapEvent {
    pub record: ChildRecord,
    pub result: std::io::Result<TerminationOutcome>,
}

/// A child whose termination was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapedChild {
    pub record: ChildRecord,
    pub outcome: TerminationOutcome,
}

/// Counters from the launch phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchStats {
    /// Lines read from the input.
    pub lines: u64,
    /// Children created.
    pub launched: usize,
    /// Lines with no tokens.
    pub skipped: usize,
    /// Over-long lines dropped under `line_overflow = "reject"`.
    pub rejected: usize,
    /// Over-long lines launched in truncated form.
    pub truncated: usize,
}

/// Result of a whole run. Used for logging and tests only; the runner's
/// exit status never depends on child outcomes.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub launch: LaunchStats,
    /// In the order the children were reaped.
    pub reaped: Vec<ReapedChild>,
    /// Whether cancellation (Ctrl-C or reap timeout) was requested.
    pub cancelled: bool,
}

pub mod launcher;
pub mod reaper;
pub mod runtime;

pub use launcher::Launcher;
pub use reaper::Reaper;
pub use runtime::{Runtime, RuntimeOptions};
