//! The chat client: session, router and input handling wired together.
//!
//! [`Client`] is synchronous. It routes every [`Event`] into a
//! [`PresentationSink`] and hands back only the transport work
//! ([`SessionAction::Open`], [`SessionAction::Send`],
//! [`SessionAction::Close`]) for a driver to carry out.

mod connector;
mod driver;

pub use connector::{Connector, TcpConnector};
pub use driver::{Driver, Input};

use slirc_proto::Message;
use tracing::debug;

use crate::command::{interpret, InputHistory, OutgoingCommand};
use crate::config::Config;
use crate::error::CommandError;
use crate::router::{Pane, Router};
use crate::session::{Event, Session, SessionAction};
use crate::sink::PresentationSink;

#[derive(Debug)]
pub struct Client {
    session: Session,
    router: Router,
    history: InputHistory,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            session: Session::new(config),
            router: Router::new(),
            history: InputHistory::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn history(&self) -> &InputHistory {
        &self.history
    }

    /// Handle one line of user input.
    pub fn submit(&mut self, line: &str, sink: &mut impl PresentationSink) -> Vec<SessionAction> {
        if line.trim().is_empty() {
            return vec![];
        }
        self.history.submit(line);

        let connected = self.session.connection().is_some();
        match interpret(line, connected).and_then(|cmd| self.execute(cmd, sink)) {
            Ok(actions) => self.perform(actions, sink),
            Err(err) => {
                debug!(code = err.error_code(), "command rejected");
                self.report(&err.to_string(), sink);
                vec![]
            }
        }
    }

    fn execute(
        &mut self,
        command: OutgoingCommand,
        sink: &mut impl PresentationSink,
    ) -> Result<Vec<SessionAction>, CommandError> {
        match command {
            OutgoingCommand::Connect => Ok(self.session.connect()),
            OutgoingCommand::Disconnect => match self.session.connection() {
                Some(_) => Ok(self.session.disconnect()),
                None => Err(CommandError::NotConnected),
            },
            OutgoingCommand::Nick(nick) => self.session.nick(&nick),
            OutgoingCommand::Join(channel) => self.session.join(&channel),
            OutgoingCommand::Msg { target, text } => {
                let actions = self.session.privmsg(&target, &text)?;
                if let Some(conn) = self.session.connection() {
                    sink.apply(&self.router.echo_direct(conn, &target, &text));
                }
                Ok(actions)
            }
            OutgoingCommand::ChatText(text) => {
                let name = self
                    .router
                    .active()
                    .and_then(|key| self.session.connection()?.target_by_key(key))
                    .map(|target| target.name().to_string())
                    .ok_or(CommandError::NoTarget)?;
                let actions = self.session.privmsg(&name, &text)?;
                if let Some(echo) = self
                    .session
                    .connection_mut()
                    .and_then(|conn| self.router.echo_own(conn, &text))
                {
                    echo.iter().for_each(|cmd| sink.apply(cmd));
                }
                Ok(actions)
            }
            OutgoingCommand::Unsupported(name) => Err(CommandError::Unsupported(name)),
        }
    }

    /// Start connecting, as `/connect` would.
    pub fn connect(&mut self, sink: &mut impl PresentationSink) -> Vec<SessionAction> {
        let actions = self.session.connect();
        self.perform(actions, sink)
    }

    /// Leave the server, as `/disconnect` would.
    pub fn disconnect(&mut self, sink: &mut impl PresentationSink) -> Vec<SessionAction> {
        let actions = self.session.disconnect();
        self.perform(actions, sink)
    }

    pub fn transport_opened(&mut self, epoch: u64, sink: &mut impl PresentationSink) -> Vec<SessionAction> {
        let actions = self.session.transport_opened(epoch);
        self.perform(actions, sink)
    }

    pub fn server_message(
        &mut self,
        epoch: u64,
        msg: &Message,
        sink: &mut impl PresentationSink,
    ) -> Vec<SessionAction> {
        let actions = self.session.handle_message(epoch, msg);
        self.perform(actions, sink)
    }

    pub fn transport_closed(
        &mut self,
        epoch: u64,
        reason: Option<String>,
        sink: &mut impl PresentationSink,
    ) -> Vec<SessionAction> {
        let actions = self.session.transport_closed(epoch, reason);
        self.perform(actions, sink)
    }

    /// Focus a target by name.
    pub fn focus(&mut self, name: &str) -> bool {
        match self.session.connection_mut() {
            Some(conn) => self.router.focus(conn, name),
            None => false,
        }
    }

    /// Route emitted events, keep transport work in order.
    fn perform(&mut self, actions: Vec<SessionAction>, sink: &mut impl PresentationSink) -> Vec<SessionAction> {
        let mut io = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                SessionAction::Emit(event) => self.route(&event, sink),
                other => io.push(other),
            }
        }
        io
    }

    fn route(&mut self, event: &Event, sink: &mut impl PresentationSink) {
        for command in self.router.dispatch(event, self.session.connection_mut()) {
            sink.apply(&command);
        }
    }

    /// Show a local notice in the focused pane.
    fn report(&self, text: &str, sink: &mut impl PresentationSink) {
        let pane = match self.router.active() {
            Some(key) => Pane::Target(key.to_string()),
            None => Pane::Server,
        };
        sink.append_info(&pane, text);
    }
}
