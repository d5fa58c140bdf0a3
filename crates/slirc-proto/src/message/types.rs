use crate::chan::ChannelExt;
use crate::command::util::find_illegal_char;
use crate::command::Command;
use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;

/// An owned IRC message.
///
/// IRCv3 tags are accepted on input but not retained; the client has no use
/// for them.
///
/// # Example
///
/// ```
/// use slirc_proto::Message;
///
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
/// assert_eq!(msg.source_nickname(), Some("nick"));
///
/// let msg = Message::privmsg("#channel", "Hello!");
/// assert_eq!(msg.to_string(), "PRIVMSG #channel :Hello!\r\n");
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message prefix/source (e.g., `nick!user@host`).
    pub prefix: Option<Prefix>,
    /// The IRC command and its parameters.
    pub command: Command,
}

impl Message {
    /// Create a new message from raw components.
    #[must_use = "message creation result should be handled"]
    pub fn new(
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, MessageParseError> {
        let prefix = prefix.map(Prefix::try_from_str).transpose()?;
        Ok(Message {
            prefix,
            command: Command::new(command, args)?,
        })
    }

    /// Get the nickname from the message prefix, if present.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }

    /// Get the appropriate target for a response.
    ///
    /// For channel messages, returns the channel name.
    /// For private messages, returns the sender's nickname.
    pub fn response_target(&self) -> Option<&str> {
        match self.command {
            Command::PRIVMSG(ref target, _) | Command::NOTICE(ref target, _)
                if target.is_channel_name() =>
            {
                Some(target)
            }
            _ => self.source_nickname(),
        }
    }

    /// Reject parameters that would break line framing.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        for param in self.command.params() {
            if let Some(c) = find_illegal_char(param) {
                return Err(ProtocolError::IllegalControlChar(c));
            }
        }
        Ok(())
    }

    /// Attach a source prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Create a PRIVMSG message to a target with text
    #[must_use]
    pub fn privmsg<T, M>(target: T, text: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Command::PRIVMSG(target.into(), text.into()).into()
    }

    /// Create a JOIN message for a channel
    #[must_use]
    pub fn join<C>(channel: C) -> Self
    where
        C: Into<String>,
    {
        Command::JOIN(channel.into(), None).into()
    }

    /// Create a NAMES request for a channel
    #[must_use]
    pub fn names<C>(channel: C) -> Self
    where
        C: Into<String>,
    {
        Command::NAMES(Some(channel.into())).into()
    }

    /// Create a NICK message to change nickname
    #[must_use]
    pub fn nick<N>(nickname: N) -> Self
    where
        N: Into<String>,
    {
        Command::NICK(nickname.into()).into()
    }

    /// Create a USER message for registration
    #[must_use]
    pub fn user<U, R>(username: U, realname: R) -> Self
    where
        U: Into<String>,
        R: Into<String>,
    {
        Command::USER(username.into(), "0".into(), realname.into()).into()
    }

    /// Create a PONG message in response to a PING token
    #[must_use]
    pub fn pong<S>(token: S) -> Self
    where
        S: Into<String>,
    {
        Command::PONG(token.into(), None).into()
    }

    /// Create a QUIT message with an optional reason
    #[must_use]
    pub fn quit(reason: Option<String>) -> Self {
        Command::QUIT(reason).into()
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message {
            prefix: None,
            command,
        }
    }
}
