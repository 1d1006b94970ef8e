//! # inlinekv
//!
//! A minimal synchronous client for RESP-style key-value servers that accept
//! inline commands:
//! - Inline request encoding (`SET foo bar\r\n`)
//! - Peek-based line framing over an unbuffered socket
//! - Decoding of status, error, integer, bulk and multi-bulk replies
//! - A four-kind error taxonomy (connection, protocol, key, value)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client                                │
//! │              (set / get / hset / hmget / ...)                │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ encode                           │ decode
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │     Command     │                │  Reply decoder  │
//!   │    (inline)     │                │ (five shapes)   │
//!   └────────┬────────┘                └────────┬────────┘
//!            │ write_all                        │ read_line / read_exact
//!            ▼                                  ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │            Connection / FrameReader                  │
//!   │               (one TCP stream)                       │
//!   └─────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod transport;
pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ClientError, ErrorKind, Result};
pub use config::{ClientConfig, ConfigBuilder};
pub use client::Client;
pub use protocol::{Command, Reply};
pub use transport::{Connection, ConnectionState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of inlinekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
