//! Codec Tests
//!
//! Tests for inline command encoding and reply decoding.

use std::io::Cursor;

use bytes::Bytes;
use inlinekv::protocol::{
    decode_bulk, decode_multi_bulk, decode_prefixed_integer, decode_status, read_reply, Command,
    Reply, BULK_PREFIX, INTEGER_PREFIX,
};
use inlinekv::transport::FrameReader;
use inlinekv::{ClientError, ErrorKind};

// =============================================================================
// Helper Functions
// =============================================================================

fn reader(bytes: &[u8]) -> FrameReader<Cursor<Vec<u8>>> {
    FrameReader::new(Cursor::new(bytes.to_vec()))
}

fn bulk(data: &str) -> Option<Bytes> {
    Some(Bytes::copy_from_slice(data.as_bytes()))
}

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_set() {
    let encoded = Command::new("SET").arg("foo").arg("bar").encode().unwrap();
    assert_eq!(&encoded[..], b"SET foo bar\r\n");
}

#[test]
fn test_encode_no_arguments() {
    let encoded = Command::new("SAVE").encode().unwrap();
    assert_eq!(&encoded[..], b"SAVE\r\n");
}

#[test]
fn test_encode_sequence_arguments_inline() {
    let encoded = Command::new("HMGET")
        .arg("user:1")
        .args(["name", "email", "age"])
        .encode()
        .unwrap();
    assert_eq!(&encoded[..], b"HMGET user:1 name email age\r\n");
}

#[test]
fn test_encode_rejects_space_in_argument() {
    let err = Command::new("SET").arg("foo").arg("hello world").encode().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_encode_rejects_line_breaks() {
    for bad in ["a\r\nFLUSHALL", "a\nb", "a\tb", "a\x0bb", "a\x0cb"] {
        let err = Command::new("GET").arg(bad).encode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value, "argument {:?}", bad);
    }
}

#[test]
fn test_encode_rejects_quotes() {
    let err = Command::new("SET").arg("k").arg("\"bar\"").encode().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);

    let err = Command::new("SET").arg("k").arg("it's").encode().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_encode_rejects_empty_argument() {
    let err = Command::new("GET").arg("").encode().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_command_accessors() {
    let cmd = Command::new("HSET").arg("k").arg("f").arg("v");
    assert_eq!(cmd.name(), "HSET");
    assert_eq!(cmd.arguments(), ["k", "f", "v"]);
}

// =============================================================================
// Status Decoding Tests
// =============================================================================

#[test]
fn test_decode_status_ok() {
    let mut r = reader(b"+OK\r\n");
    assert_eq!(decode_status(&mut r).unwrap(), "OK");
}

#[test]
fn test_decode_status_informational() {
    let mut r = reader(b"+Background saving started\r\n");
    assert_eq!(decode_status(&mut r).unwrap(), "Background saving started");
}

#[test]
fn test_decode_status_error_message() {
    let mut r = reader(b"-ERR no such key\r\n");
    match decode_status(&mut r).unwrap_err() {
        ClientError::Protocol(msg) => assert_eq!(msg, "no such key"),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_decode_status_empty_error_message() {
    let mut r = reader(b"-ERR \r\n");
    match decode_status(&mut r).unwrap_err() {
        ClientError::Protocol(msg) => assert_eq!(msg, "unknown error"),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_decode_status_generic_error_prefix() {
    let mut r = reader(b"-WRONGTYPE Operation against a key\r\n");
    let err = decode_status(&mut r).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.message(), "WRONGTYPE Operation against a key");
}

#[test]
fn test_decode_status_unexpected_prefix() {
    let mut r = reader(b":1\r\n");
    let err = decode_status(&mut r).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.message(), "unexpected prefix for status reply");
}

#[test]
fn test_decode_status_empty_line() {
    let mut r = reader(b"\r\n");
    assert_eq!(decode_status(&mut r).unwrap_err().kind(), ErrorKind::Protocol);
}

// =============================================================================
// Integer Decoding Tests
// =============================================================================

#[test]
fn test_decode_integer() {
    let mut r = reader(b":1\r\n");
    assert_eq!(decode_prefixed_integer(&mut r, INTEGER_PREFIX).unwrap(), 1);
}

#[test]
fn test_decode_negative_integer() {
    let mut r = reader(b":-42\r\n");
    assert_eq!(decode_prefixed_integer(&mut r, INTEGER_PREFIX).unwrap(), -42);
}

#[test]
fn test_decode_integer_wrong_prefix() {
    let mut r = reader(b"$1\r\n");
    let err = decode_prefixed_integer(&mut r, INTEGER_PREFIX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[test]
fn test_decode_integer_non_numeric() {
    let mut r = reader(b":abc\r\n");
    let err = decode_prefixed_integer(&mut r, INTEGER_PREFIX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_decode_integer_surfaces_server_error() {
    let mut r = reader(b"-ERR Operation against a key holding the wrong kind of value\r\n");
    let err = decode_prefixed_integer(&mut r, INTEGER_PREFIX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(
        err.message(),
        "Operation against a key holding the wrong kind of value"
    );
}

#[test]
fn test_decode_bulk_length_as_prefixed_integer() {
    let mut r = reader(b"$17\r\n");
    assert_eq!(decode_prefixed_integer(&mut r, BULK_PREFIX).unwrap(), 17);
}

// =============================================================================
// Bulk Decoding Tests
// =============================================================================

#[test]
fn test_decode_bulk() {
    let mut r = reader(b"$3\r\nbar\r\n");
    assert_eq!(decode_bulk(&mut r).unwrap(), bulk("bar"));
}

#[test]
fn test_decode_bulk_nil() {
    let mut r = reader(b"$-1\r\n");
    assert_eq!(decode_bulk(&mut r).unwrap(), None);
}

#[test]
fn test_decode_bulk_empty() {
    let mut r = reader(b"$0\r\n\r\n");
    assert_eq!(decode_bulk(&mut r).unwrap(), bulk(""));
}

#[test]
fn test_decode_bulk_binary_payload() {
    // NUL, CR and LF inside the payload must not end the frame
    let mut r = reader(b"$6\r\na\0b\r\nc\r\n");
    let value = decode_bulk(&mut r).unwrap().unwrap();
    assert_eq!(&value[..], b"a\0b\r\nc");
}

#[test]
fn test_decode_bulk_missing_terminator() {
    let mut r = reader(b"$3\r\nbarXY");
    let err = decode_bulk(&mut r).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[test]
fn test_decode_bulk_truncated_payload() {
    let mut r = reader(b"$10\r\nshort\r\n");
    let err = decode_bulk(&mut r).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[test]
fn test_decode_bulk_invalid_length() {
    let mut r = reader(b"$-5\r\n");
    assert_eq!(decode_bulk(&mut r).unwrap_err().kind(), ErrorKind::Protocol);
}

#[test]
fn test_decode_bulk_length_above_limit() {
    let mut r = reader(b"$536870913\r\n");
    let err = decode_bulk(&mut r).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.message(), "invalid bulk reply length 536870913");
}

#[test]
fn test_decode_bulk_leaves_next_reply_untouched() {
    let mut r = reader(b"$3\r\nfoo\r\n+OK\r\n");
    assert_eq!(decode_bulk(&mut r).unwrap(), bulk("foo"));
    assert_eq!(decode_status(&mut r).unwrap(), "OK");
}

// =============================================================================
// Multi-Bulk Decoding Tests
// =============================================================================

#[test]
fn test_decode_multi_bulk() {
    let mut r = reader(b"*2\r\n$1\r\na\r\n$1\r\nb\r\n");
    assert_eq!(decode_multi_bulk(&mut r).unwrap(), vec![bulk("a"), bulk("b")]);
}

#[test]
fn test_decode_multi_bulk_with_nil_element() {
    let mut r = reader(b"*3\r\n$1\r\na\r\n$-1\r\n$1\r\nc\r\n");
    assert_eq!(
        decode_multi_bulk(&mut r).unwrap(),
        vec![bulk("a"), None, bulk("c")]
    );
}

#[test]
fn test_decode_multi_bulk_empty() {
    let mut r = reader(b"*0\r\n");
    assert!(decode_multi_bulk(&mut r).unwrap().is_empty());
}

#[test]
fn test_decode_multi_bulk_nil_is_key_error() {
    let mut r = reader(b"*-1\r\n");
    let err = decode_multi_bulk(&mut r).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Key);
}

#[test]
fn test_decode_multi_bulk_negative_count() {
    let mut r = reader(b"*-2\r\n");
    let err = decode_multi_bulk(&mut r).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.message(), "invalid multi-bulk reply count -2");
}

#[test]
fn test_decode_multi_bulk_wrong_prefix() {
    let mut r = reader(b"$1\r\na\r\n");
    assert_eq!(decode_multi_bulk(&mut r).unwrap_err().kind(), ErrorKind::Protocol);
}

// =============================================================================
// Generic Reply Tests
// =============================================================================

#[test]
fn test_read_reply_each_shape() {
    let mut r = reader(b"+PONG\r\n-ERR boom\r\n:7\r\n$2\r\nhi\r\n*1\r\n$1\r\nx\r\n*-1\r\n");

    assert_eq!(read_reply(&mut r).unwrap(), Reply::Status("PONG".to_string()));
    assert_eq!(read_reply(&mut r).unwrap(), Reply::Error("boom".to_string()));
    assert_eq!(read_reply(&mut r).unwrap(), Reply::Integer(7));
    assert_eq!(read_reply(&mut r).unwrap(), Reply::Bulk(bulk("hi")));
    assert_eq!(read_reply(&mut r).unwrap(), Reply::MultiBulk(Some(vec![bulk("x")])));

    let nil = read_reply(&mut r).unwrap();
    assert_eq!(nil, Reply::MultiBulk(None));
    assert!(nil.is_nil());
}

#[test]
fn test_read_reply_unknown_prefix() {
    let mut r = reader(b"?what\r\n");
    assert_eq!(read_reply(&mut r).unwrap_err().kind(), ErrorKind::Protocol);
}

#[test]
fn test_reply_display() {
    assert_eq!(Reply::Integer(3).to_string(), "(integer) 3");
    assert_eq!(Reply::Bulk(None).to_string(), "(nil)");
    assert_eq!(
        Reply::MultiBulk(Some(vec![bulk("a"), None])).to_string(),
        "1) \"a\"\n2) (nil)"
    );
}
