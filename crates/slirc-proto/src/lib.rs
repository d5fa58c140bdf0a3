//! # slirc-proto
//!
//! The wire layer of the slirc chat client: CRLF line framing, the IRC
//! message grammar, source prefixes, numeric replies and casemapping.
//!
//! ## Features
//!
//! - Incremental line decoding over a growing byte buffer
//! - IRC message parsing (tags, prefix, command, parameters)
//! - Typed client-side commands with lossless fallback for anything else
//! - RFC 1459 / ASCII casemapping, switchable via `CASEMAPPING` ISUPPORT
//! - Optional Tokio codec and framed transport
//!
//! ## Decoding
//!
//! ```rust
//! use bytes::BytesMut;
//! use slirc_proto::IrcCodec;
//!
//! let mut codec = IrcCodec::new();
//! let mut buf = BytesMut::from("PING :abc\r\nPRIV");
//! assert!(codec.decode_message(&mut buf).unwrap().is_some());
//! assert!(codec.decode_message(&mut buf).unwrap().is_none());
//! assert_eq!(&buf[..], b"PRIV");
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{Command, Message};
//!
//! let join = Message::join("#rust");
//! assert_eq!(join.to_string(), "JOIN #rust\r\n");
//!
//! let msg: Message = ":alice!a@host PRIVMSG #rust :hello there".parse().unwrap();
//! assert_eq!(msg.source_nickname(), Some("alice"));
//! assert!(matches!(msg.command, Command::PRIVMSG(_, _)));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod command;
pub mod error;
pub mod irc;
pub mod isupport;
pub mod line;
pub mod message;
pub mod nick;
pub mod prefix;
pub mod response;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower, CaseMapping};
pub use self::chan::ChannelExt;
pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::irc::IrcCodec;
pub use self::isupport::{Isupport, IsupportEntry};
pub use self::line::{encode_line, LineCodec, DEFAULT_MAX_LINE_LEN};
pub use self::message::Message;
pub use self::nick::{
    split_membership_prefix, split_membership_prefix_with, NickExt, DEFAULT_NICK_MAX_LEN,
    MEMBERSHIP_PREFIXES,
};
pub use self::prefix::Prefix;
pub use self::response::Response;
#[cfg(feature = "tokio")]
pub use self::transport::{Transport, TransportReadError, TransportReadHalf, TransportWriteHalf};
