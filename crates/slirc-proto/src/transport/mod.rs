//! Async IRC transport.
//!
//! [`Transport`] frames any `AsyncRead + AsyncWrite` stream with
//! [`IrcCodec`](crate::IrcCodec). A plain TCP socket is the usual choice;
//! tests hand it one end of `tokio::io::duplex`.
//!
//! Once registered, a client usually wants a reader task and a writer it
//! keeps for itself. [`Transport::split`] hands out both halves and carries
//! over any bytes the framed reader had already buffered:
//!
//! ```ignore
//! let transport = Transport::new(TcpStream::connect(("irc.libera.chat", 6667)).await?);
//! let (mut reader, mut writer) = transport.split();
//! tokio::spawn(async move {
//!     while let Some(msg) = reader.read_message().await? { /* ... */ }
//! });
//! writer.write_message(&Message::nick("sup12345")).await?;
//! ```

mod error;
mod framed;
mod parts;

pub use error::TransportReadError;
pub use framed::Transport;
pub use parts::{TransportReadHalf, TransportWriteHalf};
