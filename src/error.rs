// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the codec, command client, and push client.
//!
//! Library functions return [`Error`]; callers at the application boundary
//! are expected to add `anyhow` context on top. `Display` implementations
//! never interpolate secret (`PWD`) field contents.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connect/read/write I/O failure. Fatal to the owning session.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// A socket operation did not complete within its deadline.
    #[error("connection timed out")]
    Timeout,

    /// Frame header malformed: unknown magic, length mismatch, or trailer
    /// mismatch. Fatal to the owning session.
    #[error("frame error: {0}")]
    Frame(String),

    /// XML parse failure, or a malformed tagged scalar under strict mode.
    /// Fatal to the current request.
    #[error("codec error: {0}")]
    Codec(String),

    /// Login response carried a non-zero `Err`. Fatal to the session.
    #[error("login rejected by panel (code {code})")]
    Login { code: u8 },

    /// Any other response carried a non-zero `Err`. Surfaced to the caller;
    /// the session remains usable.
    #[error("panel returned error code {code}")]
    Panel { code: u8 },

    /// Pagination anomaly: `Ln == 0` while `offset < Total`. Fatal to the
    /// current request.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Push-channel subscription ack carried a non-zero `Err`. Fatal to the
    /// push session.
    #[error("push subscription rejected by panel (code {code})")]
    PushSubscription { code: u8 },

    /// The caller-supplied alarm handler returned an error. Fatal to the
    /// push session.
    #[error("push handler failed: {0}")]
    Handler(#[source] anyhow::Error),
}
