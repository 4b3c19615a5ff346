// src/engine/runtime.rs

use std::time::Duration;

use tokio::io::AsyncBufRead;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::RunnerSettings;
use crate::engine::{Launcher, Reaper, RunSummary};
use crate::errors::Result;
use crate::exec::{OutputLayout, ProcessBackend};

/// Options for the reap phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Kill and reap whatever is still running once the reap phase has
    /// lasted this long. `None` waits forever.
    pub reap_timeout: Option<Duration>,
}

/// Drives a full run: launch every command, then reap every child.
///
/// Cancellation is a `watch` flag shared by the launcher and every child's
/// wait. Setting it stops the launch loop and kills the children that are
/// still running; they are then reaped like any other child.
pub struct Runtime<B: ProcessBackend> {
    launcher: Launcher<B>,
    reaper: Reaper,
    options: RuntimeOptions,
    cancel_tx: watch::Sender<bool>,
}

impl<B: ProcessBackend> Runtime<B> {
    pub fn new(launcher: Launcher<B>, reaper: Reaper, options: RuntimeOptions) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            launcher,
            reaper,
            options,
            cancel_tx,
        }
    }

    /// Wire a launcher and reaper from validated settings.
    pub fn from_settings(backend: B, settings: &RunnerSettings) -> Self {
        let layout = OutputLayout::new(&settings.output_dir, settings.file_mode);
        let launcher = Launcher::new(backend, settings.max_line_len, settings.line_overflow);
        let options = RuntimeOptions {
            reap_timeout: settings.reap_timeout,
        };
        Self::new(launcher, Reaper::new(layout), options)
    }

    /// Handle that requests cancellation with `send_replace(true)`.
    pub fn cancel_handle(&self) -> watch::Sender<bool> {
        self.cancel_tx.clone()
    }

    pub async fn run<R>(mut self, input: R) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        info!("runner started");

        let mut children = JoinSet::new();
        let mut cancel_rx = self.cancel_tx.subscribe();

        let launch = self
            .launcher
            .launch_all(input, &mut children, &mut cancel_rx)
            .await;

        let launch = match launch {
            Ok(stats) => stats,
            Err(e) => {
                // Process creation failed: fatal. Children already launched
                // keep running and are left unreaped.
                error!(error = %e, running = children.len(), "aborting run");
                return Err(e);
            }
        };

        info!(
            lines = launch.lines,
            launched = launch.launched,
            skipped = launch.skipped,
            rejected = launch.rejected,
            "input exhausted; reaping children"
        );

        let timer = self.options.reap_timeout.map(|timeout| {
            let cancel_tx = self.cancel_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                warn!(?timeout, "reap timeout elapsed; killing remaining children");
                cancel_tx.send_replace(true);
            })
        });

        let reaped = self.reaper.reap_all(&mut children).await;

        if let Some(timer) = timer {
            timer.abort();
        }

        let cancelled = *self.cancel_tx.borrow();
        info!(reaped = reaped.len(), cancelled, "all children reaped");

        Ok(RunSummary {
            launch,
            reaped,
            cancelled,
        })
    }
}
