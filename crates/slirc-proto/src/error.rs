//! Error types for the IRC wire layer.
//!
//! [`ProtocolError`] covers framing and transport failures; the
//! [`MessageParseError`] it may wrap describes why a single line did not
//! match the message grammar.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
///
/// Every variant except [`ProtocolError::Io`] is recoverable: the offending
/// line has already been removed from the read buffer, so the next decode
/// starts at the following terminator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded the configured maximum length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Outgoing parameter would break line framing.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// Failed to parse an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The invalid line, without its terminator.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

impl ProtocolError {
    /// Whether the stream can keep being read after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ProtocolError::Io(_))
    }
}

/// Errors encountered when parsing IRC messages.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty after stripping the terminator.
    #[error("empty message")]
    EmptyMessage,

    /// Command token was missing or was neither letters nor a 3-digit numeric.
    #[error("invalid command at position {position}")]
    InvalidCommand {
        /// Byte offset where the command was expected.
        position: usize,
    },

    /// Tags section was not followed by anything.
    #[error("unterminated tags section")]
    UnterminatedTags,

    /// Invalid message prefix.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Not enough arguments for a typed command.
    #[error("{command}: not enough arguments: expected {expected}, got {got}")]
    NotEnoughArguments {
        /// Command name.
        command: &'static str,
        /// Expected number of arguments.
        expected: usize,
        /// Actual number of arguments.
        got: usize,
    },
}
