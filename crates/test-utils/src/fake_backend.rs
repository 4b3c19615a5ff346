use std::sync::{Arc, Mutex};
use std::time::Duration;

use multirun::errors::{Result, RunnerError};
use multirun::exec::backend::cancelled;
use multirun::exec::{LaunchRequest, ProcessBackend, SpawnedChild, WaitFuture};
use multirun::types::TerminationOutcome;
use tokio::sync::watch;

/// A command the fake backend was asked to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeLaunch {
    pub pid: u32,
    pub seq: u64,
    pub argv: Vec<String>,
}

/// A fake backend that:
/// - hands out pids counting up from 1000
/// - records which commands were "launched"
/// - resolves each wait according to a tiny script language in the argv:
///   - `sleep <ms> [code]`: exit with `code` (default 0) after `ms`
///   - `exit <code>`: exit with `code` immediately
///   - `signal <n>`: killed by signal `n` immediately
///   - `hang`: never ends unless cancelled
///   - `spawn-fails`: process creation fails
///   - anything else: exit 0 immediately
///
/// On cancellation a running fake child resolves as killed by signal 9.
pub struct FakeBackend {
    next_pid: u32,
    launched: Arc<Mutex<Vec<FakeLaunch>>>,
}

impl FakeBackend {
    pub fn new(launched: Arc<Mutex<Vec<FakeLaunch>>>) -> Self {
        Self {
            next_pid: 1000,
            launched,
        }
    }
}

fn script(argv: &[String]) -> (Option<Duration>, TerminationOutcome) {
    let num = |i: usize| argv.get(i).and_then(|s| s.parse::<u64>().ok());
    match argv[0].as_str() {
        "sleep" => (
            Some(Duration::from_millis(num(1).unwrap_or(0))),
            TerminationOutcome::Exited(num(2).unwrap_or(0) as i32),
        ),
        "exit" => (None, TerminationOutcome::Exited(num(1).unwrap_or(0) as i32)),
        "signal" => (None, TerminationOutcome::Signaled(num(1).unwrap_or(15) as i32)),
        "hang" => (Some(Duration::MAX), TerminationOutcome::Exited(0)),
        _ => (None, TerminationOutcome::Exited(0)),
    }
}

impl ProcessBackend for FakeBackend {
    fn spawn(
        &mut self,
        request: &LaunchRequest,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<SpawnedChild> {
        let argv: Vec<String> = request
            .argv
            .as_slice()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        if argv[0] == "spawn-fails" {
            return Err(RunnerError::Spawn {
                seq: request.seq,
                program: argv[0].clone(),
                source: std::io::Error::other("Resource temporarily unavailable"),
            });
        }

        let pid = self.next_pid;
        self.next_pid += 1;

        self.launched.lock().unwrap().push(FakeLaunch {
            pid,
            seq: request.seq,
            argv: argv.clone(),
        });

        let (delay, outcome) = script(&argv);
        let wait: WaitFuture = Box::pin(async move {
            let Some(delay) = delay else {
                return Ok::<_, std::io::Error>(outcome);
            };
            tokio::select! {
                _ = sleep_for(delay) => Ok(outcome),
                _ = cancelled(&mut cancel) => Ok(TerminationOutcome::Signaled(9)),
            }
        });

        Ok(SpawnedChild { pid, wait })
    }
}

async fn sleep_for(delay: Duration) {
    if delay == Duration::MAX {
        std::future::pending::<()>().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}
