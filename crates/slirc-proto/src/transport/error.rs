//! Transport error types.

use thiserror::Error;

use crate::error::ProtocolError;

/// Errors that can occur when reading from a transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportReadError {
    /// An I/O error occurred.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A protocol error occurred.
    #[error("transport protocol error: {0}")]
    Protocol(ProtocolError),
}

impl From<ProtocolError> for TransportReadError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Io(io) => TransportReadError::Io(io),
            other => TransportReadError::Protocol(other),
        }
    }
}

impl TransportReadError {
    /// Whether reading may continue: only a bad line, never a dead socket.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TransportReadError::Io(_) => false,
            TransportReadError::Protocol(e) => e.is_recoverable(),
        }
    }
}
