// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod exit_codes;
pub mod input;
pub mod logging;
pub mod types;

use std::path::Path;

use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, info, warn};

use crate::cli::RunArgs;
use crate::config::{ConfigFile, RawConfigFile, RunnerSettings, load_or_default};
use crate::engine::{RunSummary, Runtime};
use crate::errors::{Result, RunnerError};
use crate::exec::{OutputLayout, RealProcessBackend};
use crate::input::{LineReader, tokenize};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the real process backend (this binary as the `launch` shim)
/// - the launch / reap runtime
/// - Ctrl-C handling
pub async fn run(args: RunArgs) -> Result<RunSummary> {
    let settings = resolve_settings(&args)?;
    debug!(?settings, "effective settings");

    if args.dry_run {
        return match args.input.as_deref() {
            Some(path) => print_dry_run(open_input(path).await?, &settings).await,
            None => print_dry_run(BufReader::new(tokio::io::stdin()), &settings).await,
        }
        .map(|()| RunSummary::default());
    }

    std::fs::create_dir_all(&settings.output_dir).map_err(|source| RunnerError::OutputFiles {
        path: settings.output_dir.clone(),
        source,
    })?;

    let layout = OutputLayout::new(&settings.output_dir, settings.file_mode);
    let backend = RealProcessBackend::current_exe(layout)?;
    let runtime = Runtime::from_settings(backend, &settings);

    // Ctrl-C → stop launching, kill and reap what is running.
    let ctrl_c = {
        let cancel = runtime.cancel_handle();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            warn!("Ctrl-C received; cancelling run");
            cancel.send_replace(true);
        })
    };

    let summary = match args.input.as_deref() {
        Some(path) => runtime.run(open_input(path).await?).await,
        None => runtime.run(BufReader::new(tokio::io::stdin())).await,
    };
    ctrl_c.abort();

    let summary = summary?;
    info!(
        launched = summary.launch.launched,
        failed = summary.reaped.iter().filter(|c| !c.outcome.success()).count(),
        "run complete"
    );
    Ok(summary)
}

/// Merge config file values (or defaults) with CLI overrides and validate.
pub fn resolve_settings(args: &RunArgs) -> Result<RunnerSettings> {
    let mut raw: RawConfigFile = load_or_default(args.config.as_deref())?;

    if let Some(dir) = &args.output_dir {
        raw.runner.output_dir = dir.clone();
    }
    if let Some(len) = args.max_line_len {
        raw.runner.max_line_len = len;
    }
    if let Some(policy) = args.line_overflow {
        raw.runner.line_overflow = policy;
    }
    if let Some(mode) = args.file_mode {
        raw.runner.file_mode = mode;
    }
    if let Some(timeout) = &args.reap_timeout {
        raw.runner.reap_timeout = Some(timeout.clone());
    }

    Ok(ConfigFile::try_from(raw)?.runner)
}

async fn open_input(path: &Path) -> Result<BufReader<tokio::fs::File>> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(RunnerError::Input)?;
    Ok(BufReader::new(file))
}

/// Dry-run output: the commands that would be launched, with their
/// sequence numbers.
async fn print_dry_run<R>(input: R, settings: &RunnerSettings) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("multirun dry-run");
    println!("  max_line_len = {}", settings.max_line_len);
    println!("  line_overflow = {:?}", settings.line_overflow);
    println!("  output_dir = {}", settings.output_dir.display());
    println!("  file_mode = {:#o}", settings.file_mode);
    if let Some(timeout) = settings.reap_timeout {
        println!("  reap_timeout = {timeout:?}");
    }
    println!();

    let mut reader = LineReader::new(input, settings.max_line_len);
    let mut seq = 0u64;
    while let Some(line) = reader.next_line().await.map_err(RunnerError::Input)? {
        seq += 1;
        let note = if line.truncated { " (truncated)" } else { "" };
        match tokenize(&line.bytes) {
            Some(argv) => println!("  {seq}: {argv}{note}"),
            None => println!("  {seq}: <blank, skipped>"),
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
