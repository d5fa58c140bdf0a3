//! Connector handing the server end of each connection to the test.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use slirc_chat::client::Connector;
use tokio::io::DuplexStream;
use tokio::sync::mpsc;

use super::server::TestPeer;

/// Connects over `tokio::io::duplex`, counting attempts.
pub struct DuplexConnector {
    peers: mpsc::UnboundedSender<TestPeer>,
    attempts: Arc<AtomicUsize>,
}

impl DuplexConnector {
    /// The connector plus a receiver yielding one [`TestPeer`] per connect.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TestPeer>, Arc<AtomicUsize>) {
        let (peers, rx) = mpsc::unbounded_channel();
        let attempts = Arc::new(AtomicUsize::new(0));
        (
            Self {
                peers,
                attempts: Arc::clone(&attempts),
            },
            rx,
            attempts,
        )
    }
}

#[async_trait]
impl Connector for DuplexConnector {
    type Stream = DuplexStream;

    async fn connect(&self, _host: &str, _port: u16) -> io::Result<DuplexStream> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let (client, server) = tokio::io::duplex(64 * 1024);
        self.peers
            .send(TestPeer::new(server))
            .map_err(|_| io::Error::new(io::ErrorKind::ConnectionRefused, "test gone"))?;
        Ok(client)
    }
}
