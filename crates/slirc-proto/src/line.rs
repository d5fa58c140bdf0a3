//! CRLF line framing.
//!
//! [`LineCodec`] pulls complete lines out of a growing byte buffer and keeps
//! whatever follows the last terminator for the next call. With the `tokio`
//! feature it also implements the `tokio_util` codec traits.

use bytes::BytesMut;
#[cfg(feature = "tokio")]
use tokio_util::codec::{Decoder, Encoder};

use crate::command::util::{find_illegal_char, write_cmd};
use crate::error::{self, ProtocolError};

/// RFC 2812 line limit, terminator included.
pub const DEFAULT_MAX_LINE_LEN: usize = 512;

/// Line codec for `\n` or `\r\n` terminated input.
///
/// A line that fails (too long) is still removed from the buffer, so the
/// next call starts at the following terminator.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping the tail of an over-long line until its terminator shows up
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with the standard 512-byte limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// The configured line limit.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Take the next complete line out of `src`, terminator stripped.
    ///
    /// Returns `Ok(None)` when no terminator has arrived yet. Invalid UTF-8
    /// is replaced rather than rejected.
    pub fn next_line(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                self.next_index = src.len();

                if self.discarding {
                    src.clear();
                    self.next_index = 0;
                } else if src.len() > self.max_len {
                    let actual = src.len();
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                    return Err(ProtocolError::MessageTooLong {
                        actual,
                        limit: self.max_len,
                    });
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if std::mem::take(&mut self.discarding) {
                continue;
            }

            if line.len() > self.max_len {
                return Err(ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let text = String::from_utf8_lossy(&line);
            return Ok(Some(text.trim_end_matches(['\r', '\n']).to_owned()));
        }
    }
}

/// Build one CRLF-terminated line from a command and its parameters.
///
/// The last parameter is colon-prefixed when it is empty, contains a space,
/// or starts with `:`.
///
/// ```
/// use slirc_proto::encode_line;
///
/// assert_eq!(encode_line("PRIVMSG", &["#c", "hi there"]).unwrap(), "PRIVMSG #c :hi there\r\n");
/// assert!(encode_line("NICK", &["bad\nnick"]).is_err());
/// ```
pub fn encode_line(command: &str, params: &[&str]) -> error::Result<String> {
    for param in std::iter::once(&command).chain(params) {
        if let Some(c) = find_illegal_char(param) {
            return Err(ProtocolError::IllegalControlChar(c));
        }
    }

    let mut line = String::with_capacity(command.len() + 2 + params.iter().map(|p| p.len() + 2).sum::<usize>());
    // Writing into a String cannot fail.
    let _ = write_cmd(&mut line, command, params, false);
    line.push_str("\r\n");
    Ok(line)
}

#[cfg(feature = "tokio")]
impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        self.next_line(src)
    }
}

#[cfg(feature = "tokio")]
impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.extend_from_slice(msg.as_bytes());
        Ok(())
    }
}
