//! Sans-IO session state machine.
//!
//! The session never touches a socket. Each operation returns an ordered
//! list of [`SessionAction`]s for the caller to carry out: open or close a
//! transport, send a message, or hand an [`Event`] to the router.
//!
//! ```text
//! Disconnected --connect--> Connecting --opened--> Registering --001--> Ready
//!      ^                                                                 |
//!      +------------- disconnect / ERROR / transport closed -------------+
//! ```
//!
//! Inputs carry the epoch of the connection they came from; anything from an
//! older epoch is dropped, so a late NAMES reply can never reach a target of
//! a newer connection.
//!
//! # Example
//!
//! ```
//! use slirc_chat::config::Config;
//! use slirc_chat::session::{Session, SessionAction, SessionState};
//!
//! let config: Config = "[identity]\nnickname = \"sup12345\"".parse().unwrap();
//! let mut session = Session::new(config);
//!
//! let actions = session.connect();
//! assert!(matches!(actions[1], SessionAction::Open { epoch: 1, .. }));
//! assert_eq!(session.state(), SessionState::Connecting);
//!
//! // A second connect is a no-op.
//! assert!(session.connect().is_empty());
//! ```

mod connection;
mod event;
mod handlers;
mod target;

pub use connection::Connection;
pub use event::Event;
pub use target::{HistoryMarker, Roster, RosterEntry, Target, TargetKind};

use slirc_proto::{ChannelExt, Message, ProtocolError};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::CommandError;

/// Registration state of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No connection. Initial and terminal.
    #[default]
    Disconnected,
    /// Transport requested, NICK/USER queued.
    Connecting,
    /// Transport open, awaiting welcome (001).
    Registering,
    /// Received 001, fully connected.
    Ready,
}

/// Work for the caller, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a transport to `host:port`, tagging its input with `epoch`.
    Open { host: String, port: u16, epoch: u64 },
    /// Send this message on the current transport.
    Send(Message),
    /// Close the transport of `epoch` once queued sends are flushed.
    Close { epoch: u64 },
    /// Hand this event to the router.
    Emit(Event),
}

/// The IRC session: at most one [`Connection`] plus what is needed to make
/// the next one.
#[derive(Debug)]
pub struct Session {
    pub(super) config: Config,
    pub(super) connection: Option<Connection>,
    pub(super) last_epoch: u64,
}

impl Session {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            connection: None,
            last_epoch: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.connection
            .as_ref()
            .map_or(SessionState::Disconnected, Connection::state)
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    pub fn connection_mut(&mut self) -> Option<&mut Connection> {
        self.connection.as_mut()
    }

    /// Epoch of the live connection, if any.
    pub fn epoch(&self) -> Option<u64> {
        self.connection.as_ref().map(Connection::epoch)
    }

    /// Start a new connection and queue registration.
    ///
    /// Does nothing while a connection exists, whatever its state.
    #[must_use]
    pub fn connect(&mut self) -> Vec<SessionAction> {
        if let Some(ref conn) = self.connection {
            debug!(epoch = conn.epoch, state = ?conn.state, "connect ignored, already connected");
            return vec![];
        }

        self.last_epoch += 1;
        let epoch = self.last_epoch;
        let identity = self.config.identity();
        let host = self.config.server.host.clone();
        let port = self.config.server.port;

        info!(epoch, %host, port, nickname = %identity.nickname, "Connecting");
        self.connection = Some(Connection::new(
            epoch,
            host.clone(),
            port,
            identity.nickname.clone(),
        ));

        vec![
            SessionAction::Emit(Event::Connecting {
                host: host.clone(),
                port,
            }),
            SessionAction::Open { host, port, epoch },
            SessionAction::Send(Message::nick(identity.nickname)),
            SessionAction::Send(Message::user(identity.username, identity.realname)),
        ]
    }

    /// The transport for `epoch` is up.
    #[must_use]
    pub fn transport_opened(&mut self, epoch: u64) -> Vec<SessionAction> {
        match self.connection.as_mut() {
            Some(conn) if conn.epoch == epoch && conn.state == SessionState::Connecting => {
                debug!(epoch, "transport open, registering");
                conn.state = SessionState::Registering;
            }
            _ => debug!(epoch, "stale transport open ignored"),
        }
        vec![]
    }

    /// The transport for `epoch` failed or hit end of stream.
    #[must_use]
    pub fn transport_closed(&mut self, epoch: u64, reason: Option<String>) -> Vec<SessionAction> {
        if self.epoch() != Some(epoch) {
            debug!(epoch, "stale transport close ignored");
            return vec![];
        }
        self.teardown(reason)
    }

    /// Leave the server: QUIT, then close.
    #[must_use]
    pub fn disconnect(&mut self) -> Vec<SessionAction> {
        if self.connection.is_none() {
            debug!("disconnect ignored, not connected");
            return vec![];
        }
        let mut actions = vec![SessionAction::Send(Message::quit(None))];
        actions.extend(self.teardown(None));
        actions
    }

    /// Drop the connection and every target.
    fn teardown(&mut self, reason: Option<String>) -> Vec<SessionAction> {
        let Some(conn) = self.connection.take() else {
            return vec![];
        };
        info!(epoch = conn.epoch, reason = reason.as_deref().unwrap_or(""), "Disconnected");

        vec![
            SessionAction::Close { epoch: conn.epoch },
            SessionAction::Emit(Event::Disconnected {
                reason,
                targets: conn.targets.into_keys().collect(),
            }),
        ]
    }

    fn ready_connection(&self) -> Result<&Connection, CommandError> {
        match self.connection {
            None => Err(CommandError::NotConnected),
            Some(ref conn) if conn.state != SessionState::Ready => Err(CommandError::NotRegistered),
            Some(ref conn) => Ok(conn),
        }
    }

    /// Ask to join `channel`. Membership starts only with the server's echo.
    pub fn join(&mut self, channel: &str) -> Result<Vec<SessionAction>, CommandError> {
        self.ready_connection()?;
        if !channel.is_channel_name() {
            return Err(CommandError::InvalidChannel(channel.to_string()));
        }
        let send = self.outgoing(Message::join(channel))?;
        Ok(vec![
            SessionAction::Emit(Event::Joining {
                channel: channel.to_string(),
            }),
            send,
        ])
    }

    /// Request a nickname change. Allowed during registration, e.g. after 433.
    pub fn nick(&mut self, nickname: &str) -> Result<Vec<SessionAction>, CommandError> {
        if self.connection.is_none() {
            return Err(CommandError::NotConnected);
        }
        let send = self.outgoing(Message::nick(nickname))?;
        if let Some(conn) = self.connection.as_mut()
            && conn.state != SessionState::Ready
        {
            // Unconfirmed until 001 anyway; track what we asked for.
            conn.nickname = nickname.to_string();
        }
        Ok(vec![send])
    }

    /// Send text to a channel or nickname.
    pub fn privmsg(&mut self, target: &str, text: &str) -> Result<Vec<SessionAction>, CommandError> {
        self.ready_connection()?;
        Ok(vec![self.outgoing(Message::privmsg(target, text))?])
    }

    /// Refuse a message the line codec would reject, so the link never sees it.
    fn outgoing(&self, msg: Message) -> Result<SessionAction, CommandError> {
        let limit = self.config.server.max_line_len;
        let err = match msg.validate() {
            Err(e) => e,
            Ok(()) => {
                let actual = msg.to_string().len();
                if actual <= limit {
                    return Ok(SessionAction::Send(msg));
                }
                ProtocolError::MessageTooLong { actual, limit }
            }
        };
        debug!(error = %err, "outgoing message rejected");
        Err(CommandError::NotSent(err.to_string()))
    }
}

#[cfg(test)]
mod tests;
