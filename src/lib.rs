//! slirc-chat - IRC chat client core.
//!
//! A sans-IO [`session::Session`] tracks one server connection, a
//! [`router::Router`] turns its events into calls on a
//! [`sink::PresentationSink`], and [`command::interpret`] reads slash
//! commands. [`client::Driver`] runs it all over real sockets.

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod sink;

pub use client::{Client, Connector, Driver, Input, TcpConnector};
pub use config::Config;
pub use session::{Event, Session, SessionAction, SessionState};
