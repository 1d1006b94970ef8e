//! Client Facade
//!
//! Sequences encode → send → decode for each command and owns the
//! connection lifecycle.
//!
//! ## Usage
//! ```no_run
//! use inlinekv::{Client, ClientConfig};
//!
//! let config = ClientConfig::builder().host("127.0.0.1").port(6379).build();
//! let mut client = Client::connect(config)?;
//! client.set("greeting", "hello")?;
//! assert_eq!(client.get("greeting")?.as_deref(), Some(&b"hello"[..]));
//! # Ok::<(), inlinekv::ClientError>(())
//! ```

use std::net::TcpStream;

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::protocol::{
    decode_bulk, decode_multi_bulk, decode_prefixed_integer, decode_status, read_reply, Command,
    Reply, INTEGER_PREFIX, STATUS_OK,
};
use crate::transport::{Connection, Transport};

/// A synchronous client over one connection
///
/// One request is in flight at a time. Methods take `&mut self`, so sharing
/// a client across threads requires external synchronization.
///
/// After a `Protocol` error the stream may sit in the middle of a reply;
/// close the client and connect again rather than reusing it.
pub struct Client<S: Transport = TcpStream> {
    conn: Connection<S>,
}

impl Client<TcpStream> {
    /// Connect to the configured server, authenticating if a password is set
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let conn = Connection::connect(&config)?;
        Self::with_connection(conn, &config)
    }
}

impl<S: Transport> Client<S> {
    /// Run the client over an already established stream
    ///
    /// Authenticates first if `config.password` is set.
    pub fn with_transport(stream: S, config: &ClientConfig) -> Result<Self> {
        let conn = Connection::new(stream, config.addr(), config.max_line_size);
        Self::with_connection(conn, config)
    }

    fn with_connection(conn: Connection<S>, config: &ClientConfig) -> Result<Self> {
        let mut client = Self { conn };
        if let Some(password) = &config.password {
            client.auth(password)?;
            tracing::debug!("Authenticated with {}", client.conn.peer_addr());
        }
        Ok(client)
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.conn
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_open()
    }

    /// Release the connection. Safe to call more than once.
    pub fn close(&mut self) {
        self.conn.close();
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// `AUTH password`; the server must answer `+OK`
    pub fn auth(&mut self, password: &str) -> Result<()> {
        self.send(&Command::new("AUTH").arg(password))?;
        self.expect_ok()
    }

    /// `SET key value`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.send(&Command::new("SET").arg(key).arg(value))?;
        self.expect_ok()
    }

    /// `GET key`; `None` when the key is missing
    pub fn get(&mut self, key: &str) -> Result<Option<Bytes>> {
        self.send(&Command::new("GET").arg(key))?;
        decode_bulk(self.conn.reader()?)
    }

    /// `HSET key field value`; returns the server's count (1 if the field
    /// is new, 0 if it was overwritten)
    pub fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<i64> {
        self.send(&Command::new("HSET").arg(key).arg(field).arg(value))?;
        decode_prefixed_integer(self.conn.reader()?, INTEGER_PREFIX)
    }

    /// `HGET key field`; `None` when the field or hash is missing
    pub fn hget(&mut self, key: &str, field: &str) -> Result<Option<Bytes>> {
        self.send(&Command::new("HGET").arg(key).arg(field))?;
        decode_bulk(self.conn.reader()?)
    }

    /// `HMSET key f1 v1 f2 v2 ...`
    ///
    /// `fields` and `values` must be non-empty and of equal length; otherwise
    /// `Protocol("invalid arguments")` is returned and nothing is written.
    pub fn hmset<F, V>(&mut self, key: &str, fields: &[F], values: &[V]) -> Result<()>
    where
        F: AsRef<str>,
        V: AsRef<str>,
    {
        if fields.is_empty() || fields.len() != values.len() {
            return Err(invalid_arguments());
        }

        let pairs = fields
            .iter()
            .zip(values)
            .flat_map(|(field, value)| [field.as_ref(), value.as_ref()]);
        self.send(&Command::new("HMSET").arg(key).args(pairs))?;
        self.expect_ok()
    }

    /// `HMGET key f1 f2 ...`; one entry per field, in order
    ///
    /// # Errors
    /// - `Protocol("invalid arguments")` for an empty field list
    /// - `Key("no such key")` when the server answers with a nil multi-bulk
    pub fn hmget<F: AsRef<str>>(&mut self, key: &str, fields: &[F]) -> Result<Vec<Option<Bytes>>> {
        if fields.is_empty() {
            return Err(invalid_arguments());
        }

        let fields = fields.iter().map(|field| field.as_ref());
        self.send(&Command::new("HMGET").arg(key).args(fields))?;
        decode_multi_bulk(self.conn.reader()?)
    }

    /// `GETSET key value`; returns the previous value, if any
    pub fn getset(&mut self, key: &str, value: &str) -> Result<Option<Bytes>> {
        self.send(&Command::new("GETSET").arg(key).arg(value))?;
        decode_bulk(self.conn.reader()?)
    }

    /// `DEL key`; returns the number of keys removed
    pub fn del(&mut self, key: &str) -> Result<i64> {
        self.send(&Command::new("DEL").arg(key))?;
        decode_prefixed_integer(self.conn.reader()?, INTEGER_PREFIX)
    }

    /// `SAVE`
    pub fn save(&mut self) -> Result<()> {
        self.send(&Command::new("SAVE"))?;
        self.expect_ok()
    }

    /// `BGSAVE`; returns the server's informational status text
    pub fn bgsave(&mut self) -> Result<String> {
        self.send(&Command::new("BGSAVE"))?;
        decode_status(self.conn.reader()?)
    }

    /// Send an arbitrary command and decode whatever reply comes back
    ///
    /// Server error replies come back as [`Reply::Error`] instead of `Err`.
    pub fn call(&mut self, command: &Command) -> Result<Reply> {
        self.send(command)?;
        read_reply(self.conn.reader()?)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn send(&mut self, command: &Command) -> Result<()> {
        let bytes = command.encode()?;
        tracing::trace!(
            "Sending {} with {} argument(s) to {}",
            command.name(),
            command.arguments().len(),
            self.conn.peer_addr()
        );
        self.conn.write_all(&bytes)
    }

    fn expect_ok(&mut self) -> Result<()> {
        let status = decode_status(self.conn.reader()?)?;
        if status != STATUS_OK {
            return Err(ClientError::Protocol("expected OK response".to_string()));
        }
        Ok(())
    }
}

fn invalid_arguments() -> ClientError {
    ClientError::Protocol("invalid arguments".to_string())
}
