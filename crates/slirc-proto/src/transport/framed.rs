//! IRC transport over any byte stream.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedWrite;

use crate::error::ProtocolError;
use crate::irc::IrcCodec;
use crate::Message;

use super::error::TransportReadError;
use super::parts::{read_frame, TransportReadHalf, TransportWriteHalf};

/// IRC transport over a byte stream.
///
/// Reads decode straight from an owned buffer, so a malformed line is an
/// error for that line only and never ends the stream.
pub struct Transport<S> {
    stream: S,
    codec: IrcCodec,
    read_buf: BytesMut,
    write_buf: BytesMut,
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a stream with the standard line limit.
    pub fn new(stream: S) -> Self {
        Self::with_codec(stream, IrcCodec::new())
    }

    /// Wrap a stream with a specific codec.
    pub fn with_codec(stream: S, codec: IrcCodec) -> Self {
        Self {
            stream,
            codec,
            read_buf: BytesMut::with_capacity(4096),
            write_buf: BytesMut::new(),
        }
    }

    /// Read the next IRC message from the transport.
    ///
    /// Returns `Ok(None)` when the connection is closed. A recoverable error
    /// leaves the stream positioned at the next line.
    pub async fn read_message(&mut self) -> Result<Option<Message>, TransportReadError> {
        read_frame(&mut self.stream, &mut self.codec, &mut self.read_buf).await
    }

    /// Write an IRC message to the transport and flush it.
    pub async fn write_message(&mut self, message: &Message) -> Result<(), ProtocolError> {
        self.write_buf.clear();
        self.codec.encode_message(message, &mut self.write_buf)?;
        self.stream.write_all(&self.write_buf).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Split into independently owned read and write halves.
    ///
    /// Bytes already read but not yet decoded move to the read half.
    pub fn split(
        self,
    ) -> (
        TransportReadHalf<tokio::io::ReadHalf<S>>,
        TransportWriteHalf<tokio::io::WriteHalf<S>>,
    ) {
        let (read, write) = tokio::io::split(self.stream);

        let reader = TransportReadHalf::with_buffer(read, self.codec.clone(), self.read_buf);
        let writer = TransportWriteHalf::new(FramedWrite::new(write, self.codec));

        (reader, writer)
    }
}
