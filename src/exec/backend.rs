// src/exec/backend.rs

//! Pluggable process backend.
//!
//! The launcher talks to a `ProcessBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests while
//! keeping the production implementation here.
//!
//! - `RealProcessBackend` spawns the `launch` shim (see [`super::shim`]) with
//!   `tokio::process::Command`.
//! - Tests can provide their own backend that hands out made-up pids and
//!   resolves their waits on demand.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::errors::{Result, RunnerError};
use crate::exec::output::OutputLayout;
use crate::input::ArgVector;
use crate::types::TerminationOutcome;

/// One command to launch.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// 1-based position of the originating line in the input.
    pub seq: u64,
    pub argv: ArgVector,
}

/// Resolves once the child has terminated.
pub type WaitFuture = Pin<Box<dyn Future<Output = std::io::Result<TerminationOutcome>> + Send>>;

/// A child that has been created but not yet reaped.
pub struct SpawnedChild {
    pub pid: u32,
    pub wait: WaitFuture,
}

impl std::fmt::Debug for SpawnedChild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnedChild")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

/// Trait abstracting how commands become processes.
pub trait ProcessBackend: Send {
    /// Create a child for `request` without waiting for it.
    ///
    /// The returned wait future must kill the child and then resolve with
    /// its outcome once `cancel` turns `true`.
    fn spawn(
        &mut self,
        request: &LaunchRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<SpawnedChild>;
}

/// Real backend used in production: one `launch` shim process per command.
#[derive(Debug, Clone)]
pub struct RealProcessBackend {
    shim: PathBuf,
    layout: OutputLayout,
}

impl RealProcessBackend {
    /// `shim` is the path of the `multirun` binary; `layout` is forwarded
    /// to the shim so it creates its files where the reaper will look.
    pub fn new(shim: impl Into<PathBuf>, layout: OutputLayout) -> Self {
        Self {
            shim: shim.into(),
            layout,
        }
    }

    /// Use the currently running executable as the shim.
    pub fn current_exe(layout: OutputLayout) -> Result<Self> {
        let shim = std::env::current_exe()?;
        Ok(Self::new(shim, layout))
    }

    fn shim_command(&self, request: &LaunchRequest) -> Command {
        let mut cmd = Command::new(&self.shim);
        cmd.arg("launch")
            .arg("--seq")
            .arg(request.seq.to_string())
            .arg("--output-dir")
            .arg(self.layout.dir())
            .arg("--file-mode")
            .arg(format!("{:o}", self.layout.mode()))
            .arg("--")
            .args(request.argv.as_slice());

        // Children must never read the runner's command stream. They are
        // killed only on cancellation, never because the runner gave up.
        cmd.stdin(Stdio::null());
        cmd
    }
}

impl ProcessBackend for RealProcessBackend {
    fn spawn(
        &mut self,
        request: &LaunchRequest,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<SpawnedChild> {
        let spawn_error = |source| RunnerError::Spawn {
            seq: request.seq,
            program: request.argv.program_lossy(),
            source,
        };

        let mut child = self.shim_command(request).spawn().map_err(spawn_error)?;
        let pid = child
            .id()
            .ok_or_else(|| spawn_error(std::io::Error::other("child has no pid after spawn")))?;

        debug!(seq = request.seq, pid, "launch shim spawned");

        let wait: WaitFuture = Box::pin(async move {
            let status = tokio::select! {
                status = child.wait() => status?,
                _ = cancelled(&mut cancel) => {
                    debug!(pid, "cancellation requested; killing child");
                    if let Err(e) = child.start_kill() {
                        warn!(pid, error = %e, "failed to kill child on cancellation");
                    }
                    child.wait().await?
                }
            };
            Ok::<_, std::io::Error>(TerminationOutcome::from_status(status))
        });

        Ok(SpawnedChild { pid, wait })
    }
}

/// Resolves once `cancel` holds `true`. Never resolves if the sender is
/// dropped without cancelling.
pub async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|c| *c).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tokenize;

    #[test]
    fn shim_command_forwards_layout_and_argv() {
        let backend = RealProcessBackend::new("/usr/bin/multirun", OutputLayout::new("out", 0o640));
        let request = LaunchRequest {
            seq: 3,
            argv: tokenize(b"echo -n hi\n").unwrap(),
        };
        let cmd = backend.shim_command(&request);
        let std_cmd = cmd.as_std();

        assert_eq!(std_cmd.get_program(), "/usr/bin/multirun");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(
            args,
            [
                "launch", "--seq", "3", "--output-dir", "out", "--file-mode", "640", "--", "echo",
                "-n", "hi"
            ]
        );
    }

    #[tokio::test]
    async fn cancelled_waits_for_true() {
        let (tx, mut rx) = watch::channel(false);
        let waiter = tokio::spawn(async move { cancelled(&mut rx).await });
        tx.send_replace(true);
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("cancellation not observed")
            .unwrap();
    }
}
