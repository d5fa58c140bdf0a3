use crate::error::MessageParseError;

/// Origin of an IRC message: a server, or a user's `nick!user@host` mask.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    ServerName(String),
    /// User prefix: (nickname, username, hostname); missing parts are empty.
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse a prefix string leniently.
    ///
    /// A name containing a dot and no `!`/`@` is taken to be a server.
    pub fn new_from_str(s: &str) -> Self {
        let (before_host, host) = match s.split_once('@') {
            Some((before, host)) => (before, host),
            None => (s, ""),
        };
        let (name, user) = match before_host.split_once('!') {
            Some((name, user)) => (name, user),
            None => (before_host, ""),
        };

        if user.is_empty() && host.is_empty() && name.contains('.') {
            Prefix::ServerName(name.to_owned())
        } else {
            Prefix::Nickname(name.to_owned(), user.to_owned(), host.to_owned())
        }
    }

    /// Create a new user prefix from nick, user, and host components.
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Parse, rejecting empty prefixes and ones containing spaces or controls.
    pub fn try_from_str(s: &str) -> Result<Self, MessageParseError> {
        if s.is_empty() || s.chars().any(|c| c == ' ' || c.is_control()) {
            return Err(MessageParseError::InvalidPrefix(s.to_owned()));
        }
        Ok(Self::new_from_str(s))
    }

    /// The nickname, if this is a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// The username, if present.
    pub fn user(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(_, user, _) if !user.is_empty() => Some(user),
            _ => None,
        }
    }

    /// The hostname, or the server name for server prefixes.
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::ServerName(name) => Some(name),
            Prefix::Nickname(_, _, host) if !host.is_empty() => Some(host),
            _ => None,
        }
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::new_from_str(s)
    }
}
