//! Error types for the arena kit.

use thiserror::Error;

/// Kit Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while speaking the engine protocol.
///
/// Every variant is fatal for the session: the engine and the agent share a
/// single stream cursor, so a failed or short read leaves the two sides
/// desynchronized and no retry can recover the round structure.
#[derive(Error, Debug)]
pub enum Error {
    /// A token arrived but could not be parsed as the expected type.
    #[error("format error: expected {expected}, got {token:?}")]
    Format {
        expected: &'static str,
        token: String,
    },

    /// The input stream closed before the expected token arrived.
    #[error("protocol error: stream closed while waiting for {expected}")]
    Eof { expected: &'static str },

    /// No token arrived within the configured read deadline.
    #[error("protocol error: read deadline elapsed")]
    Deadline,

    /// A lifecycle method was called out of order.
    #[error("lifecycle error: {0}")]
    Lifecycle(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
