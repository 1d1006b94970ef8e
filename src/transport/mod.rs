//! Transport Module
//!
//! Raw byte I/O between the client and the server.
//!
//! ## Responsibilities
//! - Open TCP connections (Nagle disabled, optional timeouts)
//! - Extract single protocol lines without over-reading the socket
//! - Read exact-length binary payloads
//! - Write complete request buffers
//! - Release the socket exactly once
//!
//! ## Line Extraction
//! ```text
//!   socket:  + O K \r \n $ 3 \r \n ...
//!            └── peek ──┘
//!            └ consume ┘│ next reply stays in the kernel buffer
//! ```
//! Bytes are first peeked, searched for `\n`, and only the bytes up to and
//! including the delimiter are consumed. Nothing past a line boundary is
//! ever pulled out of the stream.

mod stream;
mod reader;
mod connection;

pub use stream::{PeekRead, Transport};
pub use reader::{FrameReader, SCRATCH_SIZE};
pub use connection::{Connection, ConnectionState};
