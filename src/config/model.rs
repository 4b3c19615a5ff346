// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::LineOverflow;

/// Configuration as read from a TOML file.
///
/// ```toml
/// [runner]
/// max_line_len = 1024
/// line_overflow = "truncate"
/// output_dir = "."
/// file_mode = 0o600
/// reap_timeout = "30s"
/// ```
///
/// All sections and keys are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runner: RunnerSection,
}

/// `[runner]` section, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Longest accepted command line in bytes, newline excluded.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,

    /// `"truncate"` (default) or `"reject"`.
    #[serde(default)]
    pub line_overflow: LineOverflow,

    /// Directory that receives the `{pid}.out` / `{pid}.err` files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Creation mode of the output files. Owner-only unless overridden;
    /// `0o777` reproduces the historical world-writable files.
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,

    /// Optional bound on the reap phase, e.g. `"30s"`. When it elapses the
    /// remaining children are killed and reaped. Unbounded if absent.
    #[serde(default)]
    pub reap_timeout: Option<String>,
}

pub const DEFAULT_MAX_LINE_LEN: usize = 1024;
pub const DEFAULT_FILE_MODE: u32 = 0o600;

fn default_max_line_len() -> usize {
    DEFAULT_MAX_LINE_LEN
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            line_overflow: LineOverflow::default(),
            output_dir: default_output_dir(),
            file_mode: default_file_mode(),
            reap_timeout: None,
        }
    }
}

/// Validated configuration.
///
/// Can only be built through `TryFrom<RawConfigFile>`, so holding one means
/// the limits are sane and durations are parsed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub runner: RunnerSettings,
}

/// Effective settings the launcher and reaper run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    pub max_line_len: usize,
    pub line_overflow: LineOverflow,
    pub output_dir: PathBuf,
    pub file_mode: u32,
    pub reap_timeout: Option<Duration>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            line_overflow: LineOverflow::default(),
            output_dir: default_output_dir(),
            file_mode: DEFAULT_FILE_MODE,
            reap_timeout: None,
        }
    }
}

impl ConfigFile {
    pub(crate) fn new_unchecked(runner: RunnerSettings) -> Self {
        Self { runner }
    }
}
