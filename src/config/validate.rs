// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile, RunnerSection, RunnerSettings};
use crate::errors::{Result, RunnerError};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RunnerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let runner = validate_runner_section(&raw.runner)?;
        Ok(ConfigFile::new_unchecked(runner))
    }
}

/// Validate a raw config without consuming it.
pub fn validate_config(raw: &RawConfigFile) -> Result<()> {
    validate_runner_section(&raw.runner).map(|_| ())
}

fn validate_runner_section(section: &RunnerSection) -> Result<RunnerSettings> {
    if section.max_line_len == 0 {
        return Err(RunnerError::ConfigError(
            "[runner].max_line_len must be >= 1 (got 0)".to_string(),
        ));
    }

    if section.file_mode > 0o7777 {
        return Err(RunnerError::ConfigError(format!(
            "[runner].file_mode must be a permission mode <= 0o7777 (got {:#o})",
            section.file_mode
        )));
    }

    if section.output_dir.as_os_str().is_empty() {
        return Err(RunnerError::ConfigError(
            "[runner].output_dir must not be empty".to_string(),
        ));
    }

    let reap_timeout = section
        .reap_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()
        .map_err(|e| RunnerError::ConfigError(format!("[runner].reap_timeout: {e}")))?;

    Ok(RunnerSettings {
        max_line_len: section.max_line_len,
        line_overflow: section.line_overflow,
        output_dir: section.output_dir.clone(),
        file_mode: section.file_mode,
        reap_timeout,
    })
}
