use std::fmt;
use std::process::ExitStatus;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// What to do with an input line longer than `max_line_len`.
///
/// - `Truncate`: keep the first `max_line_len` bytes, drop the rest of the
///   line, and launch what was kept (default).
/// - `Reject`: drop the whole line and launch nothing for it.
///
/// In both cases the bytes past the limit never leak into the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineOverflow {
    #[default]
    Truncate,
    Reject,
}

impl FromStr for LineOverflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "truncate" => Ok(LineOverflow::Truncate),
            "reject" => Ok(LineOverflow::Reject),
            other => Err(format!(
                "invalid line_overflow: {other} (expected \"truncate\" or \"reject\")"
            )),
        }
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationOutcome {
    /// Normal exit with the given code.
    Exited(i32),
    /// Terminated by the given signal number.
    Signaled(i32),
}

impl TerminationOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match (status.code(), status.signal()) {
            (Some(code), _) => TerminationOutcome::Exited(code),
            (None, Some(sig)) => TerminationOutcome::Signaled(sig),
            // Stopped/continued statuses are never reported by a plain wait.
            (None, None) => TerminationOutcome::Exited(-1),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, TerminationOutcome::Exited(0))
    }
}

/// The line written to a child's `.err` file once it has been reaped.
impl fmt::Display for TerminationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationOutcome::Exited(code) => write!(f, "Exited with exitcode = {code}"),
            TerminationOutcome::Signaled(sig) => write!(f, "Killed with signal {sig}"),
        }
    }
}

/// Parse a duration like `"500ms"`, `"3s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

/// Parse a file mode given in octal, with or without a `0o` / `0` prefix.
pub fn parse_file_mode(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = u32::from_str_radix(digits, 8)
        .map_err(|e| format!("invalid octal file mode '{s}': {e}"))?;
    if mode > 0o7777 {
        return Err(format!("file mode {s} out of range (max 0o7777)"));
    }
    Ok(mode)
}
