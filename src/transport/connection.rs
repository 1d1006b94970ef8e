//! Connection
//!
//! Exclusive owner of one server stream.

use std::net::{TcpStream, ToSocketAddrs};

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use super::{FrameReader, Transport};

/// Lifecycle state of a [`Connection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

/// A single server connection
///
/// The stream is released exactly once: on the first [`Connection::close`]
/// or on drop, whichever comes first. Every I/O call after that fails with a
/// `Connection` error.
pub struct Connection<S: Transport = TcpStream> {
    /// Framed stream; `None` once closed
    reader: Option<FrameReader<S>>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream> {
    /// Open a TCP connection to the configured endpoint
    ///
    /// Disables Nagle's algorithm and applies any configured timeouts.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let addr = config.addr();

        let stream = match config.connect_timeout() {
            Some(timeout) => connect_with_timeout(&addr, timeout),
            None => TcpStream::connect(&addr).map_err(ClientError::from),
        }
        .map_err(|e| {
            ClientError::Connection(format!("cannot connect to {}: {}", addr, e.message()))
        })?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        tracing::debug!("Connected to {}", addr);

        Ok(Self::new(stream, addr, config.max_line_size))
    }
}

impl<S: Transport> Connection<S> {
    /// Take ownership of an already established stream
    pub fn new(stream: S, peer_addr: impl Into<String>, max_line_size: usize) -> Self {
        Self {
            reader: Some(FrameReader::with_max_line_size(stream, max_line_size)),
            peer_addr: peer_addr.into(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.reader.is_some() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// The owned stream, while open
    pub fn stream(&self) -> Option<&S> {
        self.reader.as_ref().map(FrameReader::get_ref)
    }

    /// The framed reader replies are decoded from
    pub fn reader(&mut self) -> Result<&mut FrameReader<S>> {
        self.reader
            .as_mut()
            .ok_or_else(|| ClientError::Connection("connection is closed".to_string()))
    }

    /// Write the whole buffer and flush it
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.reader()?.get_mut();
        stream.write_all(bytes)?;
        stream.flush()?;
        Ok(())
    }

    /// See [`FrameReader::read_line`]
    pub fn read_line(&mut self, max_size: usize) -> Result<String> {
        self.reader()?.read_line(max_size)
    }

    /// See [`FrameReader::read_exact`]
    pub fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        self.reader()?.read_exact(n)
    }

    /// Release the stream. Calling this again is a no-op.
    pub fn close(&mut self) {
        if let Some(reader) = self.reader.take() {
            let mut stream = reader.into_inner();
            if let Err(e) = stream.shutdown() {
                tracing::debug!("Shutdown of {} reported: {}", self.peer_addr, e);
            }
            tracing::debug!("Connection to {} closed", self.peer_addr);
        }
    }
}

impl<S: Transport> Drop for Connection<S> {
    fn drop(&mut self) {
        self.close();
    }
}

fn connect_with_timeout(addr: &str, timeout: std::time::Duration) -> Result<TcpStream> {
    let mut last_err = None;
    for socket_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&socket_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(match last_err {
        Some(e) => e.into(),
        None => ClientError::Connection("address resolved to nothing".to_string()),
    })
}
