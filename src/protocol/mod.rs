//! Protocol Module
//!
//! Defines the wire protocol spoken with the server.
//!
//! ## Request Format (inline)
//! ```text
//! SET foo bar\r\n
//! └┬┘ └┬┘ └┬┘└┬─┘
//!  │   │   │  └─ CRLF terminator
//!  └───┴───┴──── name and arguments, single-space separated
//! ```
//! Requests are not length-prefixed, so arguments must be non-empty and
//! free of whitespace and quotes.
//!
//! ## Reply Format
//! | Prefix | Shape      | Example                          |
//! |--------|------------|----------------------------------|
//! | `+`    | status     | `+OK\r\n`                        |
//! | `-`    | error      | `-ERR no such key\r\n`           |
//! | `:`    | integer    | `:1\r\n`                         |
//! | `$`    | bulk       | `$3\r\nbar\r\n`, `$-1\r\n`       |
//! | `*`    | multi-bulk | `*2\r\n$1\r\na\r\n$1\r\nb\r\n`   |

mod command;
mod reply;
mod codec;

pub use command::{Command, CRLF};
pub use reply::Reply;
pub use codec::{
    decode_bulk, decode_multi_bulk, decode_prefixed_integer, decode_status, read_reply,
    MAX_BULK_SIZE,
};

/// Status text the server uses to acknowledge a command
pub const STATUS_OK: &str = "OK";

pub const STATUS_PREFIX: u8 = b'+';
pub const ERROR_PREFIX: u8 = b'-';
pub const INTEGER_PREFIX: u8 = b':';
pub const BULK_PREFIX: u8 = b'$';
pub const MULTI_BULK_PREFIX: u8 = b'*';
