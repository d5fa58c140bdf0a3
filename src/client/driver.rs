//! Event loop driving a [`Client`] over real transports.
//!
//! All state lives on the loop. Each connection gets a link task that owns
//! the socket: it forwards decoded messages into the loop's queue tagged with
//! its epoch, and writes whatever the loop queues for it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use slirc_proto::{IrcCodec, Message, Transport, TransportReadError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Client, Connector};
use crate::config::Config;
use crate::error::TransportError;
use crate::session::SessionAction;
use crate::sink::PresentationSink;

/// How long shutdown waits for a link to flush its QUIT.
const CLOSE_LINGER: Duration = Duration::from_secs(2);

/// One entry on the loop's queue.
#[derive(Debug)]
pub enum Input {
    /// A line typed by the user.
    User(String),
    /// The transport of this epoch is up.
    Opened(u64),
    Server(u64, Message),
    /// The transport of this epoch is gone, with the failure if any.
    Closed(u64, Option<String>),
    /// Disconnect and stop the loop.
    Shutdown,
}

struct Link {
    outbound: mpsc::UnboundedSender<Message>,
    task: JoinHandle<()>,
}

/// Single-threaded driver: one queue in, one sink out.
pub struct Driver<C: Connector, S: PresentationSink> {
    client: Client,
    sink: S,
    connector: Arc<C>,
    max_line_len: usize,
    tx: mpsc::UnboundedSender<Input>,
    rx: mpsc::UnboundedReceiver<Input>,
    links: HashMap<u64, Link>,
    current: Option<u64>,
    closing: Vec<JoinHandle<()>>,
}

impl<C: Connector, S: PresentationSink> Driver<C, S> {
    pub fn new(config: Config, connector: C, sink: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            max_line_len: config.server.max_line_len,
            client: Client::new(config),
            sink,
            connector: Arc::new(connector),
            tx,
            rx,
            links: HashMap::new(),
            current: None,
            closing: Vec::new(),
        }
    }

    /// Sender for feeding user input (and shutdown) into the loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<Input> {
        self.tx.clone()
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Start connecting without waiting for `/connect`.
    pub fn connect(&mut self) {
        let actions = self.client.connect(&mut self.sink);
        self.perform(actions);
    }

    /// Process inputs until [`Input::Shutdown`] or every sender is gone.
    pub async fn run(&mut self) {
        while let Some(input) = self.rx.recv().await {
            if !self.step(input) {
                break;
            }
        }
        self.shutdown().await;
    }

    /// Apply one input. Returns `false` to stop.
    fn step(&mut self, input: Input) -> bool {
        let actions = match input {
            Input::User(line) => self.client.submit(&line, &mut self.sink),
            Input::Opened(epoch) => self.client.transport_opened(epoch, &mut self.sink),
            Input::Server(epoch, msg) => self.client.server_message(epoch, &msg, &mut self.sink),
            Input::Closed(epoch, reason) => {
                if let Some(link) = self.links.remove(&epoch) {
                    self.closing.push(link.task);
                }
                if self.current == Some(epoch) {
                    self.current = None;
                }
                self.client.transport_closed(epoch, reason, &mut self.sink)
            }
            Input::Shutdown => return false,
        };
        self.perform(actions);
        true
    }

    async fn shutdown(&mut self) {
        let actions = self.client.disconnect(&mut self.sink);
        self.perform(actions);
        for (_, link) in self.links.drain() {
            drop(link.outbound);
            self.closing.push(link.task);
        }
        for mut task in self.closing.drain(..) {
            match tokio::time::timeout(CLOSE_LINGER, &mut task).await {
                Ok(Err(e)) => warn!(error = %e, "link task failed"),
                Ok(Ok(())) => {}
                Err(_) => {
                    debug!("link task still busy, aborting");
                    task.abort();
                }
            }
        }
    }

    fn perform(&mut self, actions: Vec<SessionAction>) {
        for action in actions {
            match action {
                SessionAction::Open { host, port, epoch } => {
                    let (outbound, outbound_rx) = mpsc::unbounded_channel();
                    let task = tokio::spawn(run_link(
                        Arc::clone(&self.connector),
                        host,
                        port,
                        epoch,
                        self.max_line_len,
                        outbound_rx,
                        self.tx.clone(),
                    ));
                    self.links.insert(epoch, Link { outbound, task });
                    self.current = Some(epoch);
                }
                SessionAction::Send(msg) => {
                    let link = self.current.and_then(|epoch| self.links.get(&epoch));
                    match link {
                        Some(link) => {
                            if link.outbound.send(msg).is_err() {
                                debug!("link already gone, message dropped");
                            }
                        }
                        None => debug!(command = %msg.command.name(), "no transport, message dropped"),
                    }
                }
                SessionAction::Close { epoch } => {
                    // Dropping the sender lets queued messages flush first.
                    if let Some(link) = self.links.remove(&epoch) {
                        self.closing.push(link.task);
                    }
                    if self.current == Some(epoch) {
                        self.current = None;
                    }
                }
                SessionAction::Emit(event) => {
                    debug!(kind = event.kind(), "unrouted event");
                }
            }
        }
        self.closing.retain(|task| !task.is_finished());
    }
}

/// Own one connection's socket until it fails or the loop lets go of it.
async fn run_link<C: Connector>(
    connector: Arc<C>,
    host: String,
    port: u16,
    epoch: u64,
    max_line_len: usize,
    mut outbound: mpsc::UnboundedReceiver<Message>,
    inbox: mpsc::UnboundedSender<Input>,
) {
    let stream = match connector.connect(&host, port).await {
        Ok(stream) => stream,
        Err(source) => {
            let err = TransportError::Connect { host, port, source };
            warn!(epoch, error = %err, "connect failed");
            let _ = inbox.send(Input::Closed(epoch, Some(err.to_string())));
            return;
        }
    };
    info!(epoch, %host, port, "Transport open");

    let transport = Transport::with_codec(stream, IrcCodec::with_max_len(max_line_len));
    let (mut reader, mut writer) = transport.split();
    if inbox.send(Input::Opened(epoch)).is_err() {
        return;
    }

    let failure = loop {
        tokio::select! {
            out = outbound.recv() => match out {
                Some(msg) => {
                    debug!(epoch, line = %msg.to_string().trim_end(), "send");
                    match writer.write_message(&msg).await {
                        Ok(()) => {}
                        Err(e) if e.is_recoverable() => {
                            warn!(epoch, error = %e, "dropping unencodable message");
                        }
                        Err(e) => break TransportError::Write(e),
                    }
                }
                None => {
                    if let Err(e) = writer.close().await {
                        debug!(epoch, error = %e, "close after quit failed");
                    }
                    info!(epoch, "Transport closed");
                    return;
                }
            },
            read = reader.read_message() => match read {
                Ok(Some(msg)) => {
                    debug!(epoch, line = %msg.to_string().trim_end(), "recv");
                    if inbox.send(Input::Server(epoch, msg)).is_err() {
                        return;
                    }
                }
                Ok(None) => break TransportError::Eof,
                Err(TransportReadError::Io(e)) => break TransportError::Read(e),
                Err(e) => warn!(epoch, error = %e, "skipping bad line"),
            },
        }
    };

    warn!(epoch, error = %failure, "transport failed");
    let _ = inbox.send(Input::Closed(epoch, Some(failure.to_string())));
}
