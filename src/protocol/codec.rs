//! Protocol codec
//!
//! Reply decoding on top of a [`FrameReader`].
//!
//! The typed decoders (`decode_status`, `decode_prefixed_integer`,
//! `decode_bulk`, `decode_multi_bulk`) each expect one reply shape and fail
//! on anything else. [`read_reply`] accepts any shape and returns a
//! [`Reply`].
//!
//! Every decoder classifies the reply line into a [`Header`] first, so a
//! server error line is always surfaced as a `Protocol` error carrying the
//! server's message, whichever shape was expected.

use bytes::Bytes;

use crate::error::{ClientError, Result};
use crate::transport::{FrameReader, PeekRead};
use super::{
    Reply, BULK_PREFIX, CRLF, ERROR_PREFIX, INTEGER_PREFIX, MULTI_BULK_PREFIX, STATUS_PREFIX,
};

/// Largest bulk payload accepted from the server (512 MB)
pub const MAX_BULK_SIZE: i64 = 512 * 1024 * 1024;

/// Text reported for an error reply with no message
const UNKNOWN_ERROR: &str = "unknown error";

/// A reply line split into its prefix and remainder
enum Header<'a> {
    Status(&'a str),
    Error(String),
    Integer(&'a str),
    Bulk(&'a str),
    MultiBulk(&'a str),
    Unknown(u8),
}

fn classify(line: &str) -> Result<Header<'_>> {
    let Some(&prefix) = line.as_bytes().first() else {
        return Err(ClientError::Protocol("empty single line reply".to_string()));
    };
    let rest = line.get(1..).unwrap_or("");

    Ok(match prefix {
        STATUS_PREFIX => Header::Status(rest),
        ERROR_PREFIX => Header::Error(error_message(rest)),
        INTEGER_PREFIX => Header::Integer(rest),
        BULK_PREFIX => Header::Bulk(rest),
        MULTI_BULK_PREFIX => Header::MultiBulk(rest),
        other => Header::Unknown(other),
    })
}

/// Strip the conventional `ERR ` marker from an error line body
fn error_message(rest: &str) -> String {
    let message = match rest.strip_prefix("ERR") {
        Some("") => "",
        Some(tail) if tail.starts_with(' ') => &tail[1..],
        _ => rest,
    };

    if message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message.to_string()
    }
}

fn server_error(message: String) -> ClientError {
    tracing::warn!("Server replied with error: {}", message);
    ClientError::Protocol(message)
}

fn shape_name(prefix: u8) -> &'static str {
    match prefix {
        STATUS_PREFIX => "status",
        INTEGER_PREFIX => "integer",
        BULK_PREFIX => "bulk",
        MULTI_BULK_PREFIX => "multi-bulk",
        _ => "unknown",
    }
}

fn parse_integer(text: &str) -> Result<i64> {
    text.parse::<i64>()
        .map_err(|_| ClientError::Value("invalid number".to_string()))
}

// =============================================================================
// Typed Decoders
// =============================================================================

/// Decode a status reply, returning its text
///
/// # Errors
/// - `Protocol(message)` for an error reply (`"unknown error"` if empty)
/// - `Protocol("unexpected prefix for status reply")` for any other shape
pub fn decode_status<R: PeekRead>(reader: &mut FrameReader<R>) -> Result<String> {
    let line = reader.next_line()?;
    tracing::trace!("Status reply line: {:?}", line);

    match classify(&line)? {
        Header::Status(text) => Ok(text.to_string()),
        Header::Error(message) => Err(server_error(message)),
        Header::Integer(_) | Header::Bulk(_) | Header::MultiBulk(_) | Header::Unknown(_) => Err(
            ClientError::Protocol("unexpected prefix for status reply".to_string()),
        ),
    }
}

/// Decode a line that must start with `expected_prefix` followed by a
/// signed integer
///
/// # Errors
/// - `Protocol` if the prefix differs (error replies carry the server text)
/// - `Value("invalid number")` if the remainder is not an integer
pub fn decode_prefixed_integer<R: PeekRead>(
    reader: &mut FrameReader<R>,
    expected_prefix: u8,
) -> Result<i64> {
    let line = reader.next_line()?;
    tracing::trace!("Prefixed reply line: {:?}", line);

    let digits = match (classify(&line)?, expected_prefix) {
        (Header::Error(message), _) => return Err(server_error(message)),
        (Header::Status(rest), STATUS_PREFIX)
        | (Header::Integer(rest), INTEGER_PREFIX)
        | (Header::Bulk(rest), BULK_PREFIX)
        | (Header::MultiBulk(rest), MULTI_BULK_PREFIX) => rest,
        (Header::Status(_), _)
        | (Header::Integer(_), _)
        | (Header::Bulk(_), _)
        | (Header::MultiBulk(_), _)
        | (Header::Unknown(_), _) => {
            return Err(ClientError::Protocol(format!(
                "unexpected prefix for {} reply",
                shape_name(expected_prefix)
            )))
        }
    };

    parse_integer(digits)
}

/// Decode a bulk reply; `None` is the nil sentinel (`$-1`)
///
/// The payload is binary-safe and may contain any byte value.
pub fn decode_bulk<R: PeekRead>(reader: &mut FrameReader<R>) -> Result<Option<Bytes>> {
    let length = decode_prefixed_integer(reader, BULK_PREFIX)?;
    read_bulk_body(reader, length)
}

/// Decode a multi-bulk reply into its ordered elements
///
/// # Errors
/// - `Key("no such key")` for the nil multi-bulk (`*-1`); an empty
///   multi-bulk (`*0`) is returned as an empty vector
pub fn decode_multi_bulk<R: PeekRead>(reader: &mut FrameReader<R>) -> Result<Vec<Option<Bytes>>> {
    let count = decode_prefixed_integer(reader, MULTI_BULK_PREFIX)?;
    // A nil multi-bulk cannot be told apart from "present but nil" here;
    // both surface as a missing key.
    match read_multi_bulk_body(reader, count)? {
        Some(items) => Ok(items),
        None => Err(ClientError::Key("no such key".to_string())),
    }
}

// =============================================================================
// Generic Decoder
// =============================================================================

/// Decode one reply of any shape
///
/// Error replies are returned as [`Reply::Error`] rather than raised, and the
/// nil multi-bulk is returned as `Reply::MultiBulk(None)`.
pub fn read_reply<R: PeekRead>(reader: &mut FrameReader<R>) -> Result<Reply> {
    let line = reader.next_line()?;
    tracing::trace!("Reply line: {:?}", line);

    match classify(&line)? {
        Header::Status(text) => Ok(Reply::Status(text.to_string())),
        Header::Error(message) => Ok(Reply::Error(message)),
        Header::Integer(digits) => Ok(Reply::Integer(parse_integer(digits)?)),
        Header::Bulk(digits) => {
            let length = parse_integer(digits)?;
            Ok(Reply::Bulk(read_bulk_body(reader, length)?))
        }
        Header::MultiBulk(digits) => {
            let count = parse_integer(digits)?;
            Ok(Reply::MultiBulk(read_multi_bulk_body(reader, count)?))
        }
        Header::Unknown(prefix) => Err(ClientError::Protocol(format!(
            "unknown reply prefix {:?}",
            prefix as char
        ))),
    }
}

// =============================================================================
// Bodies
// =============================================================================

fn read_bulk_body<R: PeekRead>(reader: &mut FrameReader<R>, length: i64) -> Result<Option<Bytes>> {
    if length == -1 {
        return Ok(None);
    }
    if !(0..=MAX_BULK_SIZE).contains(&length) {
        return Err(ClientError::Protocol(format!(
            "invalid bulk reply length {}",
            length
        )));
    }

    let expected = length as usize + CRLF.len();
    let mut data = reader.read_exact(expected)?;

    if data.len() != expected {
        return Err(ClientError::Protocol(
            "invalid bulk reply data; data of unexpected length".to_string(),
        ));
    }
    if !data.ends_with(CRLF) {
        return Err(ClientError::Protocol(
            "invalid bulk reply data; missing terminator".to_string(),
        ));
    }

    data.truncate(length as usize);
    Ok(Some(data))
}

fn read_multi_bulk_body<R: PeekRead>(
    reader: &mut FrameReader<R>,
    count: i64,
) -> Result<Option<Vec<Option<Bytes>>>> {
    if count == -1 {
        return Ok(None);
    }
    if count < 0 {
        return Err(ClientError::Protocol(format!(
            "invalid multi-bulk reply count {}",
            count
        )));
    }

    let mut items = Vec::new();
    for _ in 0..count {
        items.push(decode_bulk(reader)?);
    }
    Ok(Some(items))
}
