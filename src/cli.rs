// src/cli.rs

//! CLI argument parsing using `clap`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::exec::ShimRequest;
use crate::types::{LineOverflow, parse_file_mode};

/// Command-line arguments for `multirun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "multirun",
    version,
    about = "Run every command line from the input concurrently, capturing each process's output in {pid}.out / {pid}.err.",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Internal: set up output files for the current process, then exec
    /// the given program. Spawned by the runner for every command.
    #[command(hide = true)]
    Launch(LaunchArgs),
}

/// Options of a normal run.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Read commands from this file instead of standard input.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Optional config file (TOML) with a `[runner]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for the `{pid}.out` / `{pid}.err` files.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Longest accepted command line in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_line_len: Option<usize>,

    /// What to do with longer lines: `truncate` or `reject`.
    #[arg(long, value_name = "POLICY")]
    pub line_overflow: Option<LineOverflow>,

    /// Creation mode of output files, in octal (e.g. 600 or 0o777).
    #[arg(long, value_name = "OCTAL", value_parser = parse_file_mode)]
    pub file_mode: Option<u32>,

    /// Kill children still running this long after input ends (e.g. "30s").
    #[arg(long, value_name = "DURATION")]
    pub reap_timeout: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MULTIRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse and print the commands that would be launched, without
    /// running anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments of the hidden `launch` subcommand.
#[derive(Debug, Clone, Args)]
pub struct LaunchArgs {
    /// Sequence number shown in the start banner.
    #[arg(long)]
    pub seq: u64,

    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    #[arg(long, value_name = "OCTAL", value_parser = parse_file_mode)]
    pub file_mode: u32,

    /// Program and its arguments, after `--`.
    #[arg(last = true, required = true)]
    pub argv: Vec<OsString>,
}

impl From<LaunchArgs> for ShimRequest {
    fn from(args: LaunchArgs) -> Self {
        ShimRequest {
            seq: args.seq,
            output_dir: args.output_dir,
            file_mode: args.file_mode,
            argv: args.argv,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
