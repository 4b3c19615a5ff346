#![allow(dead_code)]

use std::path::Path;

use multirun::config::{ConfigFile, RawConfigFile, RunnerSettings};
use multirun::types::LineOverflow;

/// Builder for `RunnerSettings` to simplify test setup.
///
/// Goes through `RawConfigFile` so every built value passed validation.
pub struct SettingsBuilder {
    config: RawConfigFile,
}

impl SettingsBuilder {
    pub fn new(output_dir: &Path) -> Self {
        let mut config = RawConfigFile::default();
        config.runner.output_dir = output_dir.to_path_buf();
        Self { config }
    }

    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.runner.max_line_len = len;
        self
    }

    pub fn line_overflow(mut self, policy: LineOverflow) -> Self {
        self.config.runner.line_overflow = policy;
        self
    }

    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.runner.file_mode = mode;
        self
    }

    pub fn reap_timeout(mut self, timeout: &str) -> Self {
        self.config.runner.reap_timeout = Some(timeout.to_string());
        self
    }

    pub fn build(self) -> RunnerSettings {
        ConfigFile::try_from(self.config)
            .expect("Failed to build valid settings from builder")
            .runner
    }
}
