//! IRC message codec.
//!
//! Wraps [`LineCodec`] and parses each line into a [`Message`]. With the
//! `tokio` feature it plugs into `Framed`/`FramedRead`.

use bytes::BytesMut;
#[cfg(feature = "tokio")]
use tokio_util::codec::{Decoder, Encoder};

use crate::error;
use crate::line::LineCodec;
use crate::message::Message;

/// Codec for encoding/decoding IRC messages.
#[derive(Debug, Clone, Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Create a codec with the standard line limit.
    pub fn new() -> Self {
        Self {
            inner: LineCodec::new(),
        }
    }

    /// Create a new codec with custom max line length.
    ///
    /// # Arguments
    /// * `max_len` - Maximum line length in bytes
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }

    /// Decode the next message from `src`.
    ///
    /// `Ok(None)` means no full line is buffered yet. A malformed line is
    /// consumed before its error is returned, so calling again continues
    /// with the following line. Blank lines are skipped.
    pub fn decode_message(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        loop {
            match self.inner.next_line(src)? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return line.parse::<Message>().map(Some),
            }
        }
    }

    /// Serialize `msg` into `dst` after checking it for framing breaks.
    pub fn encode_message(&mut self, msg: &Message, dst: &mut BytesMut) -> error::Result<()> {
        msg.validate()?;
        let line = msg.to_string();
        if line.len() > self.inner.max_len() {
            return Err(error::ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: self.inner.max_len(),
            });
        }
        dst.extend_from_slice(line.as_bytes());
        Ok(())
    }
}

#[cfg(feature = "tokio")]
impl Decoder for IrcCodec {
    type Item = Message;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        self.decode_message(src)
    }
}

#[cfg(feature = "tokio")]
impl Encoder<Message> for IrcCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        self.encode_message(&msg, dst)
    }
}
