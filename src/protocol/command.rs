//! Command definitions
//!
//! Builds inline requests.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ClientError, Result};

/// Line terminator for every request and reply line
pub const CRLF: &[u8] = b"\r\n";

/// Characters the server's inline parser splits, terminates or unquotes on
const INLINE_RESERVED: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\x0c', '"', '\''];

/// A command name plus its ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a sequence of arguments in order
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Encode as `NAME arg1 arg2 ...\r\n`
    ///
    /// Fails with a `Value` error, before producing any bytes, when the name
    /// or an argument is empty or contains whitespace or a quote character.
    /// The server's inline parser strips quotes, so they cannot round-trip.
    pub fn encode(&self) -> Result<Bytes> {
        validate_token(&self.name)?;
        for arg in &self.args {
            validate_token(arg)?;
        }

        let len = self.name.len()
            + self.args.iter().map(|arg| arg.len() + 1).sum::<usize>()
            + CRLF.len();
        let mut buf = BytesMut::with_capacity(len);

        buf.put_slice(self.name.as_bytes());
        for arg in &self.args {
            buf.put_u8(b' ');
            buf.put_slice(arg.as_bytes());
        }
        buf.put_slice(CRLF);

        Ok(buf.freeze())
    }
}

fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(ClientError::Value(
            "empty argument cannot be sent inline".to_string(),
        ));
    }
    if token.contains(INLINE_RESERVED) {
        return Err(ClientError::Value(format!(
            "argument {:?} contains whitespace or quotes and cannot be sent inline",
            token
        )));
    }
    Ok(())
}
