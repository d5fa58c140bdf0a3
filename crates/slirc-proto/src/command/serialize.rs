use std::fmt;

use super::types::Command;
use super::util::write_cmd;

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_cmd(f, &self.name(), &self.params(), self.has_freeform_trailing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_registration() {
        assert_eq!(Command::NICK("sup12345".into()).to_string(), "NICK sup12345");
        assert_eq!(
            Command::USER("sup12345".into(), "0".into(), "sup12345".into()).to_string(),
            "USER sup12345 0 * :sup12345"
        );
    }

    #[test]
    fn test_serialize_messaging() {
        assert_eq!(
            Command::PRIVMSG("#test".into(), "hello world".into()).to_string(),
            "PRIVMSG #test :hello world"
        );
        assert_eq!(
            Command::NOTICE("bob".into(), "x".into()).to_string(),
            "NOTICE bob :x"
        );
    }

    #[test]
    fn test_serialize_optional_params() {
        assert_eq!(Command::QUIT(None).to_string(), "QUIT");
        assert_eq!(Command::QUIT(Some("bye".into())).to_string(), "QUIT :bye");
        assert_eq!(Command::NAMES(Some("#c".into())).to_string(), "NAMES #c");
        assert_eq!(Command::PONG("abc".into(), None).to_string(), "PONG abc");
        assert_eq!(
            Command::PONG("two words".into(), None).to_string(),
            "PONG :two words"
        );
    }

    #[test]
    fn test_serialize_numeric_and_raw() {
        assert_eq!(
            Command::Numeric(1, vec!["me".into(), "Welcome home".into()]).to_string(),
            "001 me :Welcome home"
        );
        assert_eq!(
            Command::Raw("MODE".into(), vec!["#c".into(), "+o".into(), "bob".into()]).to_string(),
            "MODE #c +o bob"
        );
    }
}
