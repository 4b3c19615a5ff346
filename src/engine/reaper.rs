// src/engine/reaper.rs

//! Reap phase: collect terminated children and append their completion
//! records.

use std::io::Write;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::engine::{ReapEvent, ReapedChild};
use crate::errors::{Result, RunnerError};
use crate::exec::OutputLayout;
use crate::exec::output::finish_banner;
use crate::types::TerminationOutcome;

/// Writes completion records into the children's own output files.
#[derive(Debug, Clone)]
pub struct Reaper {
    layout: OutputLayout,
    parent_pid: u32,
}

impl Reaper {
    pub fn new(layout: OutputLayout) -> Self {
        Self::with_parent_pid(layout, std::process::id())
    }

    /// Report `parent_pid` in completion banners instead of our own pid.
    pub fn with_parent_pid(layout: OutputLayout, parent_pid: u32) -> Self {
        Self { layout, parent_pid }
    }

    /// Block until every child in `children` has terminated.
    ///
    /// Children are reported in termination order. A child whose wait or
    /// report fails is logged and skipped; the loop always drains the set.
    pub async fn reap_all(&self, children: &mut JoinSet<ReapEvent>) -> Vec<ReapedChild> {
        let mut reaped = Vec::with_capacity(children.len());

        while let Some(joined) = children.join_next().await {
            let event = match joined {
                Ok(event) => event,
                Err(e) => {
                    error!(error = %e, "wait task failed");
                    continue;
                }
            };

            let pid = event.record.pid;
            let outcome = match event.result {
                Ok(outcome) => outcome,
                Err(source) => {
                    let err = RunnerError::Wait { pid, source };
                    error!(pid, error = %err, "could not observe child termination");
                    continue;
                }
            };

            info!(pid, seq = event.record.seq, %outcome, "reaped");
            if let Err(e) = self.report(pid, outcome) {
                error!(pid, error = %e, "failed to write completion record");
            }

            reaped.push(ReapedChild {
                record: event.record,
                outcome,
            });
        }

        debug!(count = reaped.len(), "no children left");
        reaped
    }

    /// Append the outcome line to `{pid}.err` and the completion banner to
    /// `{pid}.out`. Both handles are closed before returning.
    pub fn report(&self, pid: u32, outcome: TerminationOutcome) -> Result<()> {
        let mut pair = self.layout.open_pair(pid)?;

        let write_err = |path, source| RunnerError::OutputFiles { path, source };

        writeln!(pair.err, "{outcome}")
            .and_then(|_| pair.err.flush())
            .map_err(|e| write_err(self.layout.err_path(pid), e))?;

        writeln!(pair.out, "{}", finish_banner(pid, self.parent_pid))
            .and_then(|_| pair.out.flush())
            .map_err(|e| write_err(self.layout.out_path(pid), e))?;

        Ok(())
    }
}
