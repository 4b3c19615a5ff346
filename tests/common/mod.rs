#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

pub use multirun_test_utils::{init_tracing, with_timeout};

/// Run the real `multirun` binary in `dir`, feeding `input` on stdin.
pub fn run_multirun(dir: &Path, input: &str, extra_args: &[&str]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_multirun"))
        .args(extra_args)
        .arg("--log-level")
        .arg("error")
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn multirun");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(input.as_bytes())
        .expect("write commands");

    child.wait_with_output().expect("wait for multirun")
}

/// Pids that got a `{pid}.out` file in `dir`, sorted.
pub fn output_pids(dir: &Path) -> Vec<u32> {
    let mut pids: Vec<u32> = std::fs::read_dir(dir)
        .expect("read output dir")
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if path.extension()? != "out" {
                return None;
            }
            path.file_stem()?.to_str()?.parse().ok()
        })
        .collect();
    pids.sort_unstable();
    pids
}

pub fn out_path(dir: &Path, pid: u32) -> PathBuf {
    dir.join(format!("{pid}.out"))
}

pub fn err_path(dir: &Path, pid: u32) -> PathBuf {
    dir.join(format!("{pid}.err"))
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// The `(out, err)` contents of every child in `dir`, in pid order.
pub fn all_outputs(dir: &Path) -> Vec<(u32, String, String)> {
    output_pids(dir)
        .into_iter()
        .map(|pid| (pid, read(&out_path(dir, pid)), read(&err_path(dir, pid))))
        .collect()
}
