//! Newline-delimited JSON transport.
//!
//! One JSON-RPC message per line. Reads are sequential; writes may come from
//! many request tasks and are serialized by a mutex so lines never interleave.

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;

use crate::error::Result;

/// Reads one message line at a time.
pub struct LineReader<R> {
    lines: Lines<BufReader<R>>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    /// Returns the next non-blank line, or `None` at end of input.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

/// Writes whole messages, one per line.
pub struct LineWriter<W> {
    inner: Mutex<W>,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Serializes `message` and writes it followed by a newline.
    pub async fn write_message<T: Serialize>(&self, message: &T) -> Result<()> {
        let mut buffer = serde_json::to_vec(message)?;
        buffer.push(b'\n');

        let mut writer = self.inner.lock().await;
        writer.write_all(&buffer).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}
