//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Every operation on [`crate::NodeAddress`] is total except parsing and
/// decoding, so there is a single failure kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text, raw octets or wire bytes that do not describe a node address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidAddress(msg.into())
    }
}
