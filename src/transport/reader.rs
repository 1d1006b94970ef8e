//! Frame Reader
//!
//! Peek-then-consume line extraction and exact-length reads over an
//! unbuffered stream.

use std::io::ErrorKind;

use bytes::{Bytes, BytesMut};

use crate::config::DEFAULT_MAX_LINE_SIZE;
use crate::error::{ClientError, Result};
use super::PeekRead;

/// Size of the peek window used while searching for a delimiter
pub const SCRATCH_SIZE: usize = 64;

/// Largest single read issued by [`FrameReader::read_exact`]
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Owns a stream plus the scratch buffer used to frame it
pub struct FrameReader<S> {
    /// Underlying byte source
    stream: S,

    /// Peek window; never holds bytes that belong to a later reply
    scratch: [u8; SCRATCH_SIZE],

    /// Limit applied by [`FrameReader::next_line`]
    max_line_size: usize,
}

impl<S: PeekRead> FrameReader<S> {
    /// Wrap a stream with the default line limit
    pub fn new(stream: S) -> Self {
        Self::with_max_line_size(stream, DEFAULT_MAX_LINE_SIZE)
    }

    /// Wrap a stream with a custom line limit
    pub fn with_max_line_size(stream: S, max_line_size: usize) -> Self {
        Self {
            stream,
            scratch: [0u8; SCRATCH_SIZE],
            max_line_size,
        }
    }

    /// The line limit used by [`FrameReader::next_line`]
    pub fn max_line_size(&self) -> usize {
        self.max_line_size
    }

    /// Read one line using the configured limit
    pub fn next_line(&mut self) -> Result<String> {
        self.read_line(self.max_line_size)
    }

    /// Read one `\n`-terminated line, consuming at most `max_size` bytes.
    ///
    /// Trailing CR/LF characters are stripped from the returned text.
    ///
    /// # Errors
    /// - `Connection("connection was closed")` if the peer closes first
    /// - `Protocol` if no delimiter appears within `max_size` bytes
    pub fn read_line(&mut self, max_size: usize) -> Result<String> {
        let mut line = Vec::new();

        while line.len() < max_size {
            let window = (max_size - line.len()).min(SCRATCH_SIZE);
            let peeked = self.peek_window(window)?;
            if peeked == 0 {
                return Err(ClientError::connection_closed());
            }

            let (take, found) = match self.scratch[..peeked].iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (peeked, false),
            };

            // The peeked bytes are already pending, so this cannot block.
            self.consume(take)?;
            line.extend_from_slice(&self.scratch[..take]);

            if found {
                return Ok(finish_line(line));
            }
        }

        Err(ClientError::Protocol(format!(
            "line exceeds maximum length of {} bytes",
            max_size
        )))
    }

    /// Read exactly `n` bytes, retrying short reads and interruptions.
    ///
    /// # Errors
    /// - `Connection("connection was closed")` if fewer than `n` bytes arrive
    pub fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        // Grow as bytes arrive; a declared length alone never sizes the buffer.
        let mut buf = BytesMut::with_capacity(n.min(READ_CHUNK_SIZE));

        while buf.len() < n {
            let filled = buf.len();
            buf.resize(filled + (n - filled).min(READ_CHUNK_SIZE), 0);

            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => return Err(ClientError::connection_closed()),
                Ok(received) => buf.truncate(filled + received),
                Err(e) if e.kind() == ErrorKind::Interrupted => buf.truncate(filled),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(buf.freeze())
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    fn peek_window(&mut self, window: usize) -> Result<usize> {
        loop {
            match self.stream.peek(&mut self.scratch[..window]) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn consume(&mut self, n: usize) -> Result<()> {
        match self.stream.read_exact(&mut self.scratch[..n]) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                Err(ClientError::connection_closed())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn finish_line(mut line: Vec<u8>) -> String {
    while matches!(line.last(), Some(b'\r' | b'\n')) {
        line.pop();
    }
    String::from_utf8_lossy(&line).into_owned()
}
