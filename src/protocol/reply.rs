//! Reply definitions
//!
//! Represents one decoded server reply.

use std::fmt;

use bytes::Bytes;

/// A reply of any of the five shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+text`
    Status(String),

    /// `-ERR message`, with the prefix already stripped
    Error(String),

    /// `:n`
    Integer(i64),

    /// `$len` payload, `None` for `$-1`
    Bulk(Option<Bytes>),

    /// `*count` bulks, `None` for `*-1`
    MultiBulk(Option<Vec<Option<Bytes>>>),
}

impl Reply {
    /// True for the nil bulk and nil multi-bulk sentinels
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Bulk(None) | Reply::MultiBulk(None))
    }
}

/// Renders replies the way an interactive client would print them.
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(text) => write!(f, "{}", text),
            Reply::Error(message) => write!(f, "(error) {}", message),
            Reply::Integer(value) => write!(f, "(integer) {}", value),
            Reply::Bulk(bulk) => write_bulk(f, bulk.as_ref()),
            Reply::MultiBulk(None) => write!(f, "(nil)"),
            Reply::MultiBulk(Some(items)) if items.is_empty() => write!(f, "(empty list)"),
            Reply::MultiBulk(Some(items)) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) ", idx + 1)?;
                    write_bulk(f, item.as_ref())?;
                }
                Ok(())
            }
        }
    }
}

fn write_bulk(f: &mut fmt::Formatter<'_>, bulk: Option<&Bytes>) -> fmt::Result {
    match bulk {
        Some(data) => write!(f, "\"{}\"", String::from_utf8_lossy(data)),
        None => write!(f, "(nil)"),
    }
}
