//! Slash-command interpreter.
//!
//! A line starting with `/` is a command: `/name rest`, with the name
//! matched case-insensitively and a single whitespace character separating
//! it from its parameters. Anything else is chat text for the focused
//! target.

use tracing::debug;

use crate::error::CommandError;

/// What a line of user input asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutgoingCommand {
    /// Plain text for the focused target.
    ChatText(String),
    Connect,
    Disconnect,
    Nick(String),
    Join(String),
    /// Private message that bypasses the focused target.
    Msg { target: String, text: String },
    /// A command we do not know, by its lowercased name.
    Unsupported(String),
}

/// Interpret one line of input.
///
/// `connected` is whether a connection exists in any state; commands that
/// need one fail with [`CommandError::NotConnected`] before their syntax is
/// checked. Callers skip blank lines.
pub fn interpret(line: &str, connected: bool) -> Result<OutgoingCommand, CommandError> {
    let Some(rest) = line.strip_prefix('/') else {
        if !connected {
            return Err(CommandError::NotConnected);
        }
        return Ok(OutgoingCommand::ChatText(line.to_string()));
    };

    let (name, params) = match rest.find(char::is_whitespace) {
        Some(idx) => {
            let sep = rest[idx..].chars().next().map_or(1, char::len_utf8);
            (&rest[..idx], Some(&rest[idx + sep..]))
        }
        None => (rest, None),
    };
    let name = name.to_lowercase();
    debug!(command = %name, "interpreting command");

    let require_connection = || {
        if connected {
            Ok(())
        } else {
            Err(CommandError::NotConnected)
        }
    };

    match name.as_str() {
        "connect" => Ok(OutgoingCommand::Connect),
        "disconnect" => Ok(OutgoingCommand::Disconnect),
        "nick" | "nickname" => {
            require_connection()?;
            match params.map(str::trim) {
                Some(nick) if !nick.is_empty() => Ok(OutgoingCommand::Nick(nick.to_string())),
                _ => Err(CommandError::MissingNick),
            }
        }
        "join" => {
            require_connection()?;
            match params {
                None | Some("") => Err(CommandError::MissingChannel),
                Some(channel) if channel.starts_with('#') && !channel.contains(' ') => {
                    Ok(OutgoingCommand::Join(channel.to_string()))
                }
                Some(other) => Err(CommandError::InvalidChannel(other.to_string())),
            }
        }
        "msg" => {
            require_connection()?;
            match params.and_then(|p| p.split_once(' ')) {
                Some((target, text)) if !target.is_empty() && !text.is_empty() => {
                    Ok(OutgoingCommand::Msg {
                        target: target.to_string(),
                        text: text.to_string(),
                    })
                }
                _ => Err(CommandError::MissingMessage),
            }
        }
        _ => Ok(OutgoingCommand::Unsupported(name)),
    }
}

/// One-line input recall.
#[derive(Debug, Default)]
pub struct InputHistory {
    last: Option<String>,
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a submitted line. Blank lines are not remembered.
    pub fn submit(&mut self, line: &str) {
        if !line.trim().is_empty() {
            self.last = Some(line.to_string());
        }
    }

    /// The last submitted line, offered only while the input field is empty.
    pub fn recall(&self, field: &str) -> Option<&str> {
        if field.is_empty() {
            self.last.as_deref()
        } else {
            None
        }
    }
}
