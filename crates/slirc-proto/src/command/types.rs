//! IRC command types.
//!
//! Only the commands a chat client sends or reacts to are typed; everything
//! else survives parsing as [`Command::Raw`] so no line is lost.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol

use crate::response::Response;

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    // === Connection Registration ===
    /// `NICK nickname`
    NICK(String),
    /// `USER username mode realname`
    USER(String, String, String),
    /// `QUIT [message]`
    QUIT(Option<String>),

    // === Channel Operations ===
    /// `JOIN channels [keys]`
    JOIN(String, Option<String>),
    /// `PART channels [message]`
    PART(String, Option<String>),
    /// `KICK channel user [comment]`
    KICK(String, String, Option<String>),
    /// `NAMES [channels]`
    NAMES(Option<String>),

    // === Messaging ===
    /// `PRIVMSG target text`
    PRIVMSG(String, String),
    /// `NOTICE target text`
    NOTICE(String, String),

    // === Miscellaneous ===
    /// `PING token [target]`
    PING(String, Option<String>),
    /// `PONG token [target]`
    PONG(String, Option<String>),
    /// `ERROR message`
    ERROR(String),

    /// A three-digit numeric reply with its parameters.
    Numeric(u16, Vec<String>),
    /// Any other command, kept verbatim.
    Raw(String, Vec<String>),
}

impl Command {
    /// The known numeric reply, if this is one.
    pub fn response(&self) -> Option<Response> {
        match self {
            Command::Numeric(code, _) => Response::from_code(*code),
            _ => None,
        }
    }

    /// The command token as it appears on the wire.
    pub fn name(&self) -> std::borrow::Cow<'_, str> {
        use std::borrow::Cow;
        match self {
            Command::NICK(_) => Cow::Borrowed("NICK"),
            Command::USER(..) => Cow::Borrowed("USER"),
            Command::QUIT(_) => Cow::Borrowed("QUIT"),
            Command::JOIN(..) => Cow::Borrowed("JOIN"),
            Command::PART(..) => Cow::Borrowed("PART"),
            Command::KICK(..) => Cow::Borrowed("KICK"),
            Command::NAMES(_) => Cow::Borrowed("NAMES"),
            Command::PRIVMSG(..) => Cow::Borrowed("PRIVMSG"),
            Command::NOTICE(..) => Cow::Borrowed("NOTICE"),
            Command::PING(..) => Cow::Borrowed("PING"),
            Command::PONG(..) => Cow::Borrowed("PONG"),
            Command::ERROR(_) => Cow::Borrowed("ERROR"),
            Command::Numeric(code, _) => Cow::Owned(format!("{:03}", code)),
            Command::Raw(name, _) => Cow::Borrowed(name),
        }
    }

    /// The parameters in wire order.
    pub fn params(&self) -> Vec<&str> {
        fn opt(v: &Option<String>) -> Option<&str> {
            v.as_deref()
        }

        match self {
            Command::NICK(n) => vec![n.as_str()],
            Command::USER(u, m, r) => vec![u.as_str(), m.as_str(), "*", r.as_str()],
            Command::QUIT(m) => opt(m).into_iter().collect(),
            Command::JOIN(c, k) => std::iter::once(c.as_str()).chain(opt(k)).collect(),
            Command::PART(c, m) => std::iter::once(c.as_str()).chain(opt(m)).collect(),
            Command::KICK(c, n, r) => [c.as_str(), n.as_str()].into_iter().chain(opt(r)).collect(),
            Command::NAMES(c) => opt(c).into_iter().collect(),
            Command::PRIVMSG(t, m) | Command::NOTICE(t, m) => vec![t.as_str(), m.as_str()],
            Command::PING(t, s) | Command::PONG(t, s) => {
                std::iter::once(t.as_str()).chain(opt(s)).collect()
            }
            Command::ERROR(m) => vec![m.as_str()],
            Command::Numeric(_, args) | Command::Raw(_, args) => {
                args.iter().map(String::as_str).collect()
            }
        }
    }

    /// Whether the last parameter is always written in trailing form.
    pub(crate) fn has_freeform_trailing(&self) -> bool {
        matches!(
            self,
            Command::USER(..)
                | Command::QUIT(Some(_))
                | Command::PART(_, Some(_))
                | Command::KICK(_, _, Some(_))
                | Command::PRIVMSG(..)
                | Command::NOTICE(..)
                | Command::ERROR(_)
        )
    }
}
