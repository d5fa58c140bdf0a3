//! Semantic events produced by the session.
//!
//! Each event is consumed once by the router. Fields named `target` (or
//! `targets`) hold case-folded target keys; the other names are spelled the
//! way the server sent them.

use crate::error::RegistrationError;

use super::target::RosterEntry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A transport is being opened.
    Connecting { host: String, port: u16 },

    /// Registration completed under `nickname`.
    Welcome { nickname: String },

    /// A JOIN was sent; success is only known from the echo.
    Joining { channel: String },

    Joined {
        target: String,
        channel: String,
        nickname: String,
        is_self: bool,
    },

    Parted {
        target: String,
        channel: String,
        nickname: String,
        reason: Option<String>,
        is_self: bool,
    },

    Kicked {
        target: String,
        channel: String,
        nickname: String,
        by: String,
        reason: Option<String>,
        is_self: bool,
    },

    /// `targets` lists every target the nickname appeared in, after
    /// re-keying. `merged` is set when a private target for `old` was folded
    /// into one that already existed for `new`.
    NickChanged {
        old: String,
        new: String,
        is_self: bool,
        targets: Vec<String>,
        merged: bool,
    },

    /// `targets` lists every target the nickname was removed from.
    Quit {
        nickname: String,
        reason: Option<String>,
        targets: Vec<String>,
    },

    Message {
        from: String,
        recipient: String,
        text: String,
    },

    /// `from` is `None` for server notices.
    Notice {
        from: Option<String>,
        recipient: String,
        text: String,
    },

    /// A complete NAMES reply; the roster has already been replaced.
    NamesList {
        target: String,
        channel: String,
        entries: Vec<RosterEntry>,
    },

    RegistrationFailed(RegistrationError),

    /// An error numeric outside registration. `subject` is the channel or
    /// nickname it concerns, when the reply names one.
    ServerError {
        code: u16,
        subject: Option<String>,
        text: String,
    },

    /// The connection is gone; `targets` were all cleared.
    Disconnected {
        reason: Option<String>,
        targets: Vec<String>,
    },
}

impl Event {
    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Connecting { .. } => "connecting",
            Event::Welcome { .. } => "welcome",
            Event::Joining { .. } => "joining",
            Event::Joined { .. } => "joined",
            Event::Parted { .. } => "parted",
            Event::Kicked { .. } => "kicked",
            Event::NickChanged { .. } => "nick-changed",
            Event::Quit { .. } => "quit",
            Event::Message { .. } => "message",
            Event::Notice { .. } => "notice",
            Event::NamesList { .. } => "names-list",
            Event::RegistrationFailed(_) => "registration-failed",
            Event::ServerError { .. } => "server-error",
            Event::Disconnected { .. } => "disconnected",
        }
    }
}
