// src/input/reader.rs

//! Bounded line reader over any async buffered input.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// One line as read from the input.
///
/// `bytes` holds at most `max_line_len` content bytes followed by the
/// trailing `\n` when the line had one and was not truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

/// Reads newline-terminated records, never holding more than
/// `max_line_len` bytes of a single line in memory.
///
/// Bytes past the limit are skipped up to and including the next newline,
/// so an over-long line never spills into the following one.
pub struct LineReader<R> {
    inner: R,
    max_line_len: usize,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(inner: R, max_line_len: usize) -> Self {
        Self {
            inner,
            max_line_len,
        }
    }

    /// Next line, or `None` once the input is exhausted.
    pub async fn next_line(&mut self) -> std::io::Result<Option<RawLine>> {
        let mut bytes = Vec::new();
        let mut truncated = false;
        let mut seen_any = false;

        loop {
            let buf = self.inner.fill_buf().await?;
            if buf.is_empty() {
                // EOF: a final line without newline still counts.
                return Ok(seen_any.then_some(RawLine { bytes, truncated }));
            }
            seen_any = true;

            let (chunk, used, done) = match buf.iter().position(|b| *b == b'\n') {
                Some(i) => (&buf[..i], i + 1, true),
                None => (buf, buf.len(), false),
            };

            let room = self.max_line_len.saturating_sub(bytes.len());
            if chunk.len() > room {
                truncated = true;
            }
            bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);

            self.inner.consume(used);

            if done {
                if !truncated {
                    bytes.push(b'\n');
                }
                return Ok(Some(RawLine { bytes, truncated }));
            }
        }
    }
}
