// src/input/tokenize.rs

//! Space-only tokenization of command lines.
//!
//! There is no quoting, escaping or expansion: a token is any run of bytes
//! that are not `' '`. Runs of spaces collapse, so empty tokens never
//! appear in an argument vector.

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStringExt;

/// A non-empty argument vector: program name followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgVector(Vec<OsString>);

impl ArgVector {
    /// Build from already-split tokens. Returns `None` if there are none.
    pub fn new(tokens: Vec<OsString>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self(tokens))
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.0[0]
    }

    pub fn args(&self) -> &[OsString] {
        &self.0[1..]
    }

    pub fn as_slice(&self) -> &[OsString] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Program name for logs and diagnostics.
    pub fn program_lossy(&self) -> String {
        self.program().to_string_lossy().into_owned()
    }
}

/// Strip the line terminator (`\n`, or `\r\n`).
pub fn strip_newline(raw: &[u8]) -> &[u8] {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Split a raw input line into an argument vector.
///
/// Returns `None` when the line holds no tokens (empty or spaces only).
pub fn tokenize(raw: &[u8]) -> Option<ArgVector> {
    let tokens = strip_newline(raw)
        .split(|b| *b == b' ')
        .filter(|tok| !tok.is_empty())
        .map(|tok| OsString::from_vec(tok.to_vec()))
        .collect();
    ArgVector::new(tokens)
}

impl std::fmt::Display for ArgVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<_> = self.0.iter().map(|a| a.to_string_lossy()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl AsRef<[OsString]> for ArgVector {
    fn as_ref(&self) -> &[OsString] {
        &self.0
    }
}
