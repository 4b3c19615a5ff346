// src/exec/output.rs

//! Per-process output files.
//!
//! Every child writes to `{pid}.out` / `{pid}.err` inside the output
//! directory. The child creates them; the reaper reopens the same pair by
//! recomputing the names from the reaped pid. Both sides open in append
//! mode, so earlier content (from the child, or from a previous run that
//! happened to get the same pid) is preserved.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::errors::{Result, RunnerError};

/// Where output files live and how they are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
    mode: u32,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            dir: dir.into(),
            mode,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn out_path(&self, pid: u32) -> PathBuf {
        self.dir.join(format!("{pid}.out"))
    }

    pub fn err_path(&self, pid: u32) -> PathBuf {
        self.dir.join(format!("{pid}.err"))
    }

    /// Open (creating if needed) the `.err` then the `.out` file of `pid`.
    pub fn open_pair(&self, pid: u32) -> Result<OutputPair> {
        let err = self.open_append(&self.err_path(pid))?;
        let out = self.open_append(&self.out_path(pid))?;
        Ok(OutputPair { out, err })
    }

    fn open_append(&self, path: &Path) -> Result<File> {
        OpenOptions::new()
            .append(true)
            .create(true)
            .mode(self.mode)
            .open(path)
            .map_err(|source| RunnerError::OutputFiles {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Open handles on one process's output files. Closed on drop.
#[derive(Debug)]
pub struct OutputPair {
    pub out: File,
    pub err: File,
}

/// First line of every `.out` file, written by the child before it runs
/// the requested program.
pub fn start_banner(seq: u64, pid: u32, parent_pid: u32) -> String {
    format!("Starting command {seq}: child {pid} pid of parent {parent_pid}")
}

/// Last line of every `.out` file, written by the reaper.
pub fn finish_banner(pid: u32, parent_pid: u32) -> String {
    format!("Finished child {pid} pid of parent {parent_pid}")
}
