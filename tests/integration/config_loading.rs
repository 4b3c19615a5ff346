// tests/integration/config_loading.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;
use multirun::cli::RunArgs;
use multirun::config::load_and_validate;
use multirun::errors::RunnerError;
use multirun::resolve_settings;
use multirun::types::LineOverflow;

#[test]
fn full_runner_section_is_parsed() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[runner]
max_line_len = 30
line_overflow = "reject"
output_dir = "runs"
file_mode = 0o777
reap_timeout = "45s"
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.runner.max_line_len, 30);
    assert_eq!(cfg.runner.line_overflow, LineOverflow::Reject);
    assert_eq!(cfg.runner.output_dir, PathBuf::from("runs"));
    assert_eq!(cfg.runner.file_mode, 0o777);
    assert_eq!(cfg.runner.reap_timeout, Some(Duration::from_secs(45)));
}

#[test]
fn empty_file_gives_defaults() {
    let file = NamedTempFile::new().unwrap();
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.runner.max_line_len, 1024);
    assert_eq!(cfg.runner.file_mode, 0o600);
    assert_eq!(cfg.runner.line_overflow, LineOverflow::Truncate);
}

#[test]
fn unknown_keys_are_toml_errors() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[runner]\nmax_line_length = 10\n").unwrap();

    match load_and_validate(file.path()) {
        Err(RunnerError::TomlError(_)) => {}
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn bad_overflow_policy_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[runner]\nline_overflow = \"wrap\"\n").unwrap();
    assert!(load_and_validate(file.path()).is_err());
}

#[test]
fn cli_flags_override_the_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "[runner]\nmax_line_len = 30\nfile_mode = 0o777\nreap_timeout = \"1m\"\n"
    )
    .unwrap();

    let args = RunArgs {
        config: Some(file.path().to_path_buf()),
        max_line_len: Some(64),
        reap_timeout: Some("250ms".into()),
        ..RunArgs::default()
    };

    let settings = resolve_settings(&args).unwrap();
    assert_eq!(settings.max_line_len, 64);
    assert_eq!(settings.file_mode, 0o777, "untouched keys keep the file's value");
    assert_eq!(settings.reap_timeout, Some(Duration::from_millis(250)));
}

#[test]
fn cli_values_are_validated_too() {
    let args = RunArgs {
        max_line_len: Some(0),
        ..RunArgs::default()
    };
    match resolve_settings(&args) {
        Err(RunnerError::ConfigError(msg)) => assert!(msg.contains("max_line_len")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn missing_config_file_is_an_io_error() {
    let args = RunArgs {
        config: Some(PathBuf::from("/no/such/multirun.toml")),
        ..RunArgs::default()
    };
    assert!(matches!(resolve_settings(&args), Err(RunnerError::IoError(_))));
}
