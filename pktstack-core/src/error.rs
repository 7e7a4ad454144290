//! Error types for pktstack

use thiserror::Error;

/// Result type alias for pktstack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pktstack
#[derive(Error, Debug)]
pub enum Error {
    /// A header needed more bytes than the buffer held
    #[error("truncated {layer} header: need {needed} bytes, have {available}")]
    Truncated {
        layer: &'static str,
        needed: usize,
        available: usize,
    },

    /// Packet parsing error
    #[error("Packet parsing error: {0}")]
    PacketParsing(String),

    /// Packet construction error
    #[error("Packet construction error: {0}")]
    PacketConstruction(String),

    /// Unknown datalink type name
    #[error("Unknown link type: {0}")]
    UnknownLinkType(String),
}

impl Error {
    /// Create a truncation error for a named header layer
    pub fn truncated(layer: &'static str, needed: usize, available: usize) -> Self {
        Error::Truncated {
            layer,
            needed,
            available,
        }
    }

    /// Create a parsing error with a custom message
    pub fn parsing<S: Into<String>>(msg: S) -> Self {
        Error::PacketParsing(msg.into())
    }

    /// Create a construction error with a custom message
    pub fn construction<S: Into<String>>(msg: S) -> Self {
        Error::PacketConstruction(msg.into())
    }

    /// True when the error reports a short buffer
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::Truncated { .. })
    }
}
