// tests/binary_scenarios.rs
mod common;
use crate::common::{all_outputs, err_path, out_path, output_pids, read, run_multirun};

use std::error::Error;
use std::os::unix::fs::PermissionsExt;
use std::process::Command;
use std::time::{Duration, Instant};

use multirun::exit_codes;

type TestResult = Result<(), Box<dyn Error>>;

fn lines(s: &str) -> Vec<&str> {
    s.lines().collect()
}

#[test]
fn echo_and_false_each_get_their_own_files() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(dir.path(), "echo hello\nfalse\n", &[]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let children = all_outputs(dir.path());
    assert_eq!(children.len(), 2, "one file pair per command");

    let (echo_pid, echo_out, echo_err) = children
        .iter()
        .find(|(_, out, _)| out.contains("hello"))
        .expect("echo child output");
    let echo_lines = lines(echo_out);
    assert_eq!(echo_lines.len(), 3);
    assert!(echo_lines[0].starts_with(&format!("Starting command 1: child {echo_pid} pid of parent ")));
    assert_eq!(echo_lines[1], "hello");
    assert!(echo_lines[2].starts_with(&format!("Finished child {echo_pid} pid of parent ")));
    assert_eq!(echo_err.as_str(), "Exited with exitcode = 0\n");

    let (false_pid, false_out, false_err) = children
        .iter()
        .find(|(pid, _, _)| pid != echo_pid)
        .expect("false child output");
    assert!(false_out.starts_with(&format!("Starting command 2: child {false_pid} pid of parent ")));
    assert!(false_err.contains("Exited with exitcode = 1"));

    Ok(())
}

#[test]
fn banners_name_the_runner_as_parent() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(dir.path(), "true\n", &[]);
    assert!(output.status.success());

    let pids = output_pids(dir.path());
    assert_eq!(pids.len(), 1);
    let out = read(&out_path(dir.path(), pids[0]));
    let out_lines = lines(&out);

    // Both banners carry the same parent pid: the runner itself.
    let start_parent = out_lines[0].rsplit(' ').next().unwrap();
    let finish_parent = out_lines[1].rsplit(' ').next().unwrap();
    assert_eq!(start_parent, finish_parent);
    Ok(())
}

#[test]
fn missing_program_is_a_launch_failure_of_that_child_only() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(dir.path(), "/no/such/binary arg1\necho still-running\n", &[]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let children = all_outputs(dir.path());
    assert_eq!(children.len(), 2);

    let (_, _, failed_err) = children
        .iter()
        .find(|(_, _, err)| err.contains("Failed to run command"))
        .expect("launch failure reported");
    assert!(failed_err.contains("Failed to run command: /no/such/binary"));
    assert!(failed_err.contains(&format!("Exited with exitcode = {}", exit_codes::LAUNCH_FAILED)));

    assert!(children.iter().any(|(_, out, _)| out.contains("still-running")));
    Ok(())
}

#[test]
fn launch_shim_exits_with_reserved_code_when_exec_fails() -> TestResult {
    let dir = tempfile::tempdir()?;

    let status = Command::new(env!("CARGO_BIN_EXE_multirun"))
        .args(["launch", "--seq", "1", "--output-dir"])
        .arg(dir.path())
        .args(["--file-mode", "600", "--", "/no/such/binary", "arg1"])
        .status()?;
    assert_eq!(status.code(), Some(exit_codes::LAUNCH_FAILED));

    let pids = output_pids(dir.path());
    assert_eq!(pids.len(), 1);
    assert!(read(&out_path(dir.path(), pids[0])).starts_with("Starting command 1: child "));
    assert!(read(&err_path(dir.path(), pids[0])).contains("Failed to run command: /no/such/binary"));
    Ok(())
}

#[test]
fn launch_shim_without_output_dir_stops_before_running() -> TestResult {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing");

    let output = Command::new(env!("CARGO_BIN_EXE_multirun"))
        .args(["launch", "--seq", "1", "--output-dir"])
        .arg(&missing)
        .args(["--file-mode", "600", "--", "echo", "should-not-run"])
        .output()?;
    assert_eq!(output.status.code(), Some(exit_codes::OUTPUT_UNAVAILABLE));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("should-not-run"));
    Ok(())
}

#[test]
fn empty_input_spawns_nothing() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(dir.path(), "", &[]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn blank_lines_are_skipped_but_counted() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(dir.path(), "\n   \necho third\n", &[]);
    assert!(output.status.success());

    let children = all_outputs(dir.path());
    assert_eq!(children.len(), 1);
    assert!(children[0].1.starts_with("Starting command 3: "));
    Ok(())
}

#[test]
fn consecutive_spaces_do_not_create_empty_arguments() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(dir.path(), "echo  a   b\n", &[]);
    assert!(output.status.success());

    let children = all_outputs(dir.path());
    assert_eq!(children.len(), 1);
    assert_eq!(lines(&children[0].1)[1], "a b");
    Ok(())
}

#[test]
fn over_long_line_is_truncated_without_bleeding_into_the_next() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(
        dir.path(),
        "echo 0123456789abcdef\necho next\n",
        &["--max-line-len", "10"],
    );
    assert!(output.status.success());

    let children = all_outputs(dir.path());
    assert_eq!(children.len(), 2, "the tail of line 1 must not become a command");

    let outs: Vec<&str> = children.iter().map(|(_, out, _)| out.as_str()).collect();
    assert!(outs.iter().any(|out| lines(out)[1] == "01234"));
    assert!(outs.iter().any(|out| lines(out)[1] == "next"));
    Ok(())
}

#[test]
fn over_long_line_can_be_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(
        dir.path(),
        "echo 0123456789abcdef\necho next\n",
        &["--max-line-len", "10", "--line-overflow", "reject"],
    );
    assert!(output.status.success());

    let children = all_outputs(dir.path());
    assert_eq!(children.len(), 1);
    assert!(children[0].1.starts_with("Starting command 2: "));
    Ok(())
}

#[test]
fn reap_timeout_kills_hung_children() -> TestResult {
    let dir = tempfile::tempdir()?;

    let started = Instant::now();
    let output = run_multirun(dir.path(), "sleep 30\necho quick\n", &["--reap-timeout", "300ms"]);
    assert!(output.status.success());
    assert!(started.elapsed() < Duration::from_secs(20));

    let children = all_outputs(dir.path());
    assert_eq!(children.len(), 2);
    assert!(children.iter().any(|(_, _, err)| err == "Killed with signal 9\n"));
    assert!(children.iter().any(|(_, _, err)| err == "Exited with exitcode = 0\n"));
    Ok(())
}

#[test]
fn output_dir_and_owner_only_mode() -> TestResult {
    let dir = tempfile::tempdir()?;
    let out_dir = dir.path().join("logs");

    let output = run_multirun(
        dir.path(),
        "echo hi\n",
        &["--output-dir", out_dir.to_str().unwrap()],
    );
    assert!(output.status.success());

    let pids = output_pids(&out_dir);
    assert_eq!(pids.len(), 1);
    let mode = std::fs::metadata(out_path(&out_dir, pids[0]))?.permissions().mode();
    assert_eq!(mode & 0o077, 0);
    Ok(())
}

#[test]
fn input_file_instead_of_stdin() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cmds = dir.path().join("cmds.txt");
    std::fs::write(&cmds, "echo from-file\n")?;

    let output = run_multirun(dir.path(), "", &["--input", cmds.to_str().unwrap()]);
    assert!(output.status.success());

    let children = all_outputs(dir.path());
    assert_eq!(children.len(), 1);
    assert!(children[0].1.contains("from-file"));
    Ok(())
}

#[test]
fn invalid_config_is_an_invalid_invocation() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = dir.path().join("multirun.toml");
    std::fs::write(&cfg, "[runner]\nmax_line_len = 0\n")?;

    let output = run_multirun(dir.path(), "echo hi\n", &["--config", cfg.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(output_pids(dir.path()).is_empty());
    Ok(())
}

#[test]
fn dry_run_lists_commands_without_running_them() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = run_multirun(dir.path(), "echo a\n\nls  -l\n", &["--dry-run"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("  1: echo a"));
    assert!(stdout.contains("  2: <blank, skipped>"));
    assert!(stdout.contains("  3: ls -l"));
    assert!(output_pids(dir.path()).is_empty());
    Ok(())
}
