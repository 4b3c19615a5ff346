// src/engine/launcher.rs

//! Launch phase: one child per input line, never waiting on any of them.

use tokio::io::AsyncBufRead;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::engine::{ChildRecord, LaunchStats, ReapEvent};
use crate::errors::{Result, RunnerError};
use crate::exec::backend::cancelled;
use crate::exec::{LaunchRequest, ProcessBackend};
use crate::input::{LineReader, RawLine, tokenize};
use crate::types::LineOverflow;

/// Reads commands and hands each one to the backend.
///
/// Each spawned child's wait is pushed into the caller's `JoinSet`, so
/// the reaper sees terminations in the order they happen.
pub struct Launcher<B: ProcessBackend> {
    backend: B,
    max_line_len: usize,
    overflow: LineOverflow,
}

impl<B: ProcessBackend> Launcher<B> {
    pub fn new(backend: B, max_line_len: usize, overflow: LineOverflow) -> Self {
        Self {
            backend,
            max_line_len,
            overflow,
        }
    }

    /// Consume `input` until it ends or cancellation is requested.
    ///
    /// A failure to create a process aborts the launch phase with
    /// [`RunnerError::Spawn`]; children launched so far stay in `children`.
    pub async fn launch_all<R>(
        &mut self,
        input: R,
        children: &mut JoinSet<ReapEvent>,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<LaunchStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut reader = LineReader::new(input, self.max_line_len);
        let mut stats = LaunchStats::default();

        loop {
            let line = tokio::select! {
                biased;
                _ = cancelled(cancel) => {
                    info!(lines = stats.lines, "cancellation requested; no further commands will be launched");
                    break;
                }
                line = reader.next_line() => line.map_err(RunnerError::Input)?,
            };

            let Some(line) = line else {
                debug!(lines = stats.lines, "end of input");
                break;
            };

            stats.lines += 1;
            let seq = stats.lines;

            let Some(request) = self.prepare(seq, line, &mut stats) else {
                continue;
            };

            let child = self.backend.spawn(&request, cancel.clone())?;
            let record = ChildRecord {
                pid: child.pid,
                seq,
            };
            info!(seq, pid = child.pid, command = %request.argv, "launched");

            let wait = child.wait;
            children.spawn(async move {
                let result = wait.await;
                ReapEvent { record, result }
            });
            stats.launched += 1;
        }

        Ok(stats)
    }

    /// Apply the overflow policy and tokenize. `None` means "launch nothing
    /// for this line".
    fn prepare(&self, seq: u64, line: RawLine, stats: &mut LaunchStats) -> Option<LaunchRequest> {
        if line.truncated {
            match self.overflow {
                LineOverflow::Reject => {
                    let err = RunnerError::LineTooLong {
                        seq,
                        limit: self.max_line_len,
                    };
                    error!(seq, error = %err, "line rejected");
                    stats.rejected += 1;
                    return None;
                }
                LineOverflow::Truncate => {
                    warn!(seq, limit = self.max_line_len, "line truncated to the maximum length");
                    stats.truncated += 1;
                }
            }
        }

        match tokenize(&line.bytes) {
            Some(argv) => Some(LaunchRequest { seq, argv }),
            None => {
                warn!(seq, "blank line; nothing to launch");
                stats.skipped += 1;
                None
            }
        }
    }
}
