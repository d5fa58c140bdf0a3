//! `FromStr` for [`Message`] on top of the nom parser.

use std::str::FromStr;

use crate::error::ProtocolError;

use super::nom_parser::ParsedMessage;
use super::types::Message;

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);
        let invalid = |cause| ProtocolError::InvalidMessage {
            string: line.to_owned(),
            cause,
        };

        let parsed = ParsedMessage::parse(line).map_err(invalid)?;

        Message::new(parsed.prefix, parsed.command, parsed.params.to_vec()).map_err(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::error::MessageParseError;
    use crate::prefix::Prefix;

    #[test]
    fn test_parse_simple_ping() {
        let msg: Message = "PING :server\r\n".parse().unwrap();
        assert_eq!(msg.command, Command::PING("server".into(), None));
    }

    #[test]
    fn test_parse_privmsg() {
        let msg: Message = ":nick!user@host PRIVMSG #channel :Hello, world!\r\n"
            .parse()
            .unwrap();
        assert_eq!(
            msg.command,
            Command::PRIVMSG("#channel".into(), "Hello, world!".into())
        );
        assert_eq!(
            msg.prefix,
            Some(Prefix::Nickname("nick".into(), "user".into(), "host".into()))
        );
    }

    #[test]
    fn test_parse_skips_tags() {
        let msg: Message = "@msgid=abc;time=x :a!b@c NOTICE me :hey".parse().unwrap();
        assert_eq!(msg.command, Command::NOTICE("me".into(), "hey".into()));
        assert_eq!(msg.source_nickname(), Some("a"));
    }

    #[test]
    fn test_parse_numeric() {
        let msg: Message = ":irc.example.com 001 sup12345 :Welcome".parse().unwrap();
        assert_eq!(
            msg.command,
            Command::Numeric(1, vec!["sup12345".into(), "Welcome".into()])
        );
        assert_eq!(msg.prefix, Some(Prefix::ServerName("irc.example.com".into())));
    }

    #[test]
    fn test_parse_errors_keep_line() {
        let err = "".parse::<Message>().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidMessage {
                cause: MessageParseError::EmptyMessage,
                ..
            }
        ));

        let err = "PRIVMSG\r\n".parse::<Message>().unwrap_err();
        match err {
            ProtocolError::InvalidMessage { string, cause } => {
                assert_eq!(string, "PRIVMSG");
                assert!(matches!(cause, MessageParseError::NotEnoughArguments { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
