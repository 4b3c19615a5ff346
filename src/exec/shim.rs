// src/exec/shim.rs

//! Child-side half of a launch.
//!
//! The runner does not fork itself. It spawns its own binary with the
//! hidden `launch` subcommand, and that process (already the child, with
//! its final pid) does the setup before replacing itself with the requested
//! program:
//!
//! 1. open `{pid}.err`, then `{pid}.out`,
//! 2. write and flush the start banner to `.out`,
//! 3. `exec` the program with stdout/stderr pointed at those files.
//!
//! Nothing here returns on success. On failure the shim writes a diagnostic
//! and hands back the exit status it should terminate with.

use std::ffi::OsString;
use std::io::Write;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::Command;

use crate::exec::output::{OutputLayout, start_banner};
use crate::exit_codes;
use crate::input::ArgVector;

/// Everything the shim needs, as passed on its command line.
#[derive(Debug, Clone)]
pub struct ShimRequest {
    pub seq: u64,
    pub output_dir: PathBuf,
    pub file_mode: u32,
    pub argv: Vec<OsString>,
}

/// Run the shim. Only returns if the program could not be started; the
/// returned value is the exit status to terminate with.
pub fn exec_command(request: ShimRequest) -> i32 {
    let Some(argv) = ArgVector::new(request.argv) else {
        eprintln!("launch: no command given");
        return exit_codes::INVALID;
    };

    let pid = std::process::id();
    let parent_pid = std::os::unix::process::parent_id();
    let layout = OutputLayout::new(request.output_dir, request.file_mode);

    // Without its files the child has nowhere to report to; it stops here
    // instead of running with the runner's streams.
    let mut pair = match layout.open_pair(pid) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("launch: {e}");
            return exit_codes::OUTPUT_UNAVAILABLE;
        }
    };

    if let Err(e) = writeln!(pair.out, "{}", start_banner(request.seq, pid, parent_pid))
        .and_then(|_| pair.out.flush())
    {
        let _ = writeln!(pair.err, "Failed to write start banner: {e}");
        return exit_codes::OUTPUT_UNAVAILABLE;
    }

    let (stdout, stderr) = match (pair.out.try_clone(), pair.err.try_clone()) {
        (Ok(out), Ok(err)) => (out, err),
        (Err(e), _) | (_, Err(e)) => {
            let _ = writeln!(pair.err, "Failed to duplicate output handles: {e}");
            return exit_codes::OUTPUT_UNAVAILABLE;
        }
    };

    let err = Command::new(argv.program())
        .args(argv.args())
        .stdout(stdout)
        .stderr(stderr)
        .exec();

    let _ = writeln!(
        pair.err,
        "Failed to run command: {} ({err})",
        argv.program_lossy()
    );
    let _ = pair.err.flush();
    exit_codes::LAUNCH_FAILED
}
