//! Error taxonomy for the chat client.
//!
//! Transport failures end the connection. Registration and command errors
//! are reported to the user and leave the session as it was. Wire-level
//! problems live in [`slirc_proto::ProtocolError`].

use slirc_proto::ProtocolError;
use thiserror::Error;

pub use crate::config::ConfigError;

// ============================================================================
// Transport Errors
// ============================================================================

/// Socket-level failure; always tears the connection down.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("write failed: {0}")]
    Write(#[source] ProtocolError),

    #[error("connection closed by server")]
    Eof,
}

// ============================================================================
// Registration Errors
// ============================================================================

/// The server refused our NICK/USER. The connection stays pending.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:03}: {text}")]
pub struct RegistrationError {
    /// Numeric reply code (e.g. 433).
    pub code: u16,
    /// Server-supplied explanation.
    pub text: String,
}

// ============================================================================
// Command Errors
// ============================================================================

/// A local command that could not be carried out. Nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("You are not connected.")]
    NotConnected,

    #[error("Still registering with the server, please wait.")]
    NotRegistered,

    #[error("/join: Please enter a channel name.")]
    MissingChannel,

    #[error("/join: '{0}' is not a channel name.")]
    InvalidChannel(String),

    #[error("/nick: Please enter a nickname.")]
    MissingNick,

    #[error("/msg: Please enter a target and a message.")]
    MissingMessage,

    #[error("Unsupported command: /{0}")]
    Unsupported(String),

    #[error("Join a channel first, or use /msg.")]
    NoTarget,

    #[error("Not sent: {0}.")]
    NotSent(String),
}

impl CommandError {
    /// Get a static error code string for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::NotRegistered => "not_registered",
            Self::MissingChannel => "missing_channel",
            Self::InvalidChannel(_) => "invalid_channel",
            Self::MissingNick => "missing_nick",
            Self::MissingMessage => "missing_message",
            Self::Unsupported(_) => "unsupported",
            Self::NoTarget => "no_target",
            Self::NotSent(_) => "not_sent",
        }
    }
}
