//! Owned read and write halves of a split [`super::Transport`].

use bytes::BytesMut;
use futures_util::SinkExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio_util::codec::FramedWrite;
use tracing::trace;

use crate::error::ProtocolError;
use crate::irc::IrcCodec;
use crate::Message;

use super::error::TransportReadError;

/// Decode from `buf`, refilling it from `reader` until a message is ready.
///
/// Bytes of an unterminated final line are never returned.
pub(super) async fn read_frame<R>(
    reader: &mut R,
    codec: &mut IrcCodec,
    buf: &mut BytesMut,
) -> Result<Option<Message>, TransportReadError>
where
    R: AsyncRead + Unpin,
{
    loop {
        if let Some(msg) = codec.decode_message(buf)? {
            return Ok(Some(msg));
        }
        buf.reserve(512);
        if reader.read_buf(buf).await? == 0 {
            if !buf.is_empty() {
                trace!(bytes = buf.len(), "unterminated line at end of stream");
            }
            return Ok(None);
        }
    }
}

/// Owned read half for a transport after splitting.
pub struct TransportReadHalf<R> {
    reader: R,
    codec: IrcCodec,
    buf: BytesMut,
}

/// Owned write half for a transport after splitting.
pub struct TransportWriteHalf<W> {
    framed: FramedWrite<W, IrcCodec>,
}

impl<R: AsyncRead + Unpin> TransportReadHalf<R> {
    pub(super) fn with_buffer(reader: R, codec: IrcCodec, buf: BytesMut) -> Self {
        Self { reader, codec, buf }
    }

    /// Wrap a bare reader.
    pub fn from_reader(reader: R, codec: IrcCodec) -> Self {
        Self::with_buffer(reader, codec, BytesMut::with_capacity(4096))
    }

    /// Read the next message; `Ok(None)` at end of stream.
    pub async fn read_message(&mut self) -> Result<Option<Message>, TransportReadError> {
        read_frame(&mut self.reader, &mut self.codec, &mut self.buf).await
    }
}

impl<W: AsyncWrite + Unpin> TransportWriteHalf<W> {
    pub(super) fn new(framed: FramedWrite<W, IrcCodec>) -> Self {
        Self { framed }
    }

    /// Wrap a bare writer.
    pub fn from_writer(writer: W, codec: IrcCodec) -> Self {
        Self::new(FramedWrite::new(writer, codec))
    }

    /// Encode, write and flush one message.
    pub async fn write_message(&mut self, message: &Message) -> Result<(), ProtocolError> {
        self.framed.send(message.clone()).await
    }

    /// Flush and shut down the write side.
    pub async fn close(&mut self) -> Result<(), ProtocolError> {
        self.framed.close().await
    }
}
