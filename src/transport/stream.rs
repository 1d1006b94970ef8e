//! Stream abstractions
//!
//! The framing layer needs one thing plain `Read` does not offer: looking at
//! pending bytes without consuming them.

use std::io::{self, BufRead, Cursor, Read, Write};
use std::net::{Shutdown, TcpStream};

/// A byte source that can inspect pending bytes without consuming them
pub trait PeekRead: Read {
    /// Copy up to `buf.len()` pending bytes into `buf` without consuming them.
    ///
    /// Blocks until at least one byte is available. Returns `Ok(0)` only when
    /// the peer has closed the stream.
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// A full-duplex stream a [`Connection`](super::Connection) can own
pub trait Transport: PeekRead + Write {
    /// Release the underlying resource. Called at most once per connection.
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PeekRead for TcpStream {
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        TcpStream::peek(self, buf)
    }
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// In-memory replies, used to decode captured byte sequences.
impl<T: AsRef<[u8]>> PeekRead for Cursor<T> {
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let pending = self.fill_buf()?;
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        Ok(n)
    }
}
